/// Session phases, in the order a participant moves through them.
///
/// `Practice` and `Test` carry the zero-based index of the trial on screen.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Welcome,
    PracticeIntro,
    Practice(usize),
    TestIntro,
    Test(usize),
    Completed,
}

impl SessionPhase {
    pub fn is_welcome(&self) -> bool {
        matches!(self, SessionPhase::Welcome)
    }

    pub fn is_practice(&self) -> bool {
        matches!(self, SessionPhase::Practice(_))
    }

    pub fn is_test(&self) -> bool {
        matches!(self, SessionPhase::Test(_))
    }

    /// Practice or test; the phases where a dial is on screen.
    pub fn is_trial(&self) -> bool {
        self.is_practice() || self.is_test()
    }

    pub fn is_intro(&self) -> bool {
        matches!(self, SessionPhase::PracticeIntro | SessionPhase::TestIntro)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SessionPhase::Completed)
    }

    pub fn trial_index(&self) -> Option<usize> {
        match self {
            SessionPhase::Practice(i) | SessionPhase::Test(i) => Some(*i),
            _ => None,
        }
    }

    /// The phase reached after leaving this one with nothing left to do in it.
    ///
    /// Trial phases step to the next index; callers check the trial count and
    /// use [`SessionPhase::after_last_trial`] once the list is exhausted.
    pub fn next(&self) -> Option<Self> {
        use SessionPhase::*;
        Some(match self {
            Welcome => PracticeIntro,
            PracticeIntro => Practice(0),
            Practice(i) => Practice(i + 1),
            TestIntro => Test(0),
            Test(i) => Test(i + 1),
            Completed => return None,
        })
    }

    pub fn after_last_trial(&self) -> Option<Self> {
        match self {
            SessionPhase::Practice(_) => Some(SessionPhase::TestIntro),
            SessionPhase::Test(_) => Some(SessionPhase::Completed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_the_full_order() {
        let mut phase = SessionPhase::default();
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            phase = match next {
                SessionPhase::Practice(1) => SessionPhase::Practice(0).after_last_trial().unwrap(),
                SessionPhase::Test(1) => SessionPhase::Test(0).after_last_trial().unwrap(),
                other => other,
            };
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                SessionPhase::Welcome,
                SessionPhase::PracticeIntro,
                SessionPhase::Practice(0),
                SessionPhase::TestIntro,
                SessionPhase::Test(0),
                SessionPhase::Completed,
            ]
        );
    }

    #[test]
    fn trial_index_only_in_trials() {
        assert_eq!(SessionPhase::Test(4).trial_index(), Some(4));
        assert_eq!(SessionPhase::TestIntro.trial_index(), None);
        assert!(SessionPhase::Practice(2).is_trial());
        assert!(!SessionPhase::Completed.is_trial());
    }
}
