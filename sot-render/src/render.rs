use crate::layout::{Frame, Layout};
use crate::text::{wrap, TextCache};
use ab_glyph::FontVec;
use anyhow::{anyhow, bail, Result};
use sot_cache::{intern_text, label};
use sot_core::{Catalog, TrialSpec};
use tiny_skia::{
    Color, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};
use tracing::debug;

const BACKGROUND: Color = Color::WHITE;
const INK: Color = Color::BLACK;

fn marker_color() -> Color {
    Color::from_rgba8(150, 150, 150, 255)
}

fn standing_color() -> Color {
    Color::from_rgba8(30, 90, 200, 255)
}

fn correct_color() -> Color {
    Color::from_rgba8(220, 0, 0, 255)
}

const TITLE_PX: f32 = 32.0;
const BODY_PX: f32 = 20.0;
const LABEL_PX: f32 = 14.0;
const MARKER_RADIUS: f32 = 10.0;
const STANDING_RADIUS: f32 = 14.0;
const LINE_WIDTH: f32 = 3.0;

/// Everything the trial screen needs from the session.
#[derive(Debug, Clone, Copy)]
pub struct TrialView<'a> {
    pub catalog: &'a Catalog,
    pub spec: &'a TrialSpec,
    pub practice: bool,
    /// Participant's current dial angle.
    pub response_angle: f64,
    /// Mirrored correct angle, present while feedback is showing.
    pub feedback_angle: Option<f64>,
    pub remaining_secs: Option<u32>,
    /// (1-based trial number, trial count).
    pub progress: Option<(usize, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultsView {
    pub avg_error_deg: f64,
    pub avg_time_sec: f64,
}

/// One full-window screen.
#[derive(Debug, Clone, Copy)]
pub enum Screen<'a> {
    Blank,
    Welcome,
    PracticeIntro { trial_count: usize },
    TestIntro { trial_count: usize, budget_secs: u32 },
    Trial(TrialView<'a>),
    Results(ResultsView),
}

pub fn format_remaining(secs: u32) -> String {
    format!("Time remaining: {}:{:02}", secs / 60, secs % 60)
}

pub fn trial_prompt(catalog: &Catalog, spec: &TrialSpec) -> String {
    format!(
        "Imagine you are standing at the {} and facing the {}. Point to the {}.",
        catalog.display_name(&spec.standing_id),
        catalog.display_name(&spec.facing_id),
        catalog.display_name(&spec.pointing_id),
    )
}

fn paint(color: Color) -> Paint<'static> {
    let mut p = Paint::default();
    p.anti_alias = false;
    p.set_color(color);
    p
}

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        ..Stroke::default()
    }
}

fn stroke_line(pm: &mut Pixmap, from: (f32, f32), to: (f32, f32), color: Color, width: f32) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    if let Some(path) = pb.finish() {
        pm.stroke_path(&path, &paint(color), &stroke(width), Transform::identity(), None);
    }
}

fn fill_circle(pm: &mut Pixmap, c: (f32, f32), r: f32, color: Color) {
    if let Some(path) = PathBuilder::from_circle(c.0, c.1, r) {
        pm.fill_path(&path, &paint(color), FillRule::Winding, Transform::identity(), None);
    }
}

fn stroke_circle(pm: &mut Pixmap, c: (f32, f32), r: f32, color: Color, width: f32) {
    if let Some(path) = PathBuilder::from_circle(c.0, c.1, r) {
        pm.stroke_path(&path, &paint(color), &stroke(width), Transform::identity(), None);
    }
}

fn stroke_frame(pm: &mut Pixmap, f: Frame, color: Color) {
    if let Some(rect) = Rect::from_xywh(f.x, f.y, f.w, f.h) {
        let path = PathBuilder::from_rect(rect);
        pm.stroke_path(&path, &paint(color), &stroke(1.0), Transform::identity(), None);
    }
}

/// Paints test screens into an offscreen pixmap that the window copies out.
///
/// Shapes are always drawn; text only when a font was supplied.
pub struct SceneRenderer {
    layout: Layout,
    canvas: Pixmap,
    text: Option<TextCache>,
}

impl SceneRenderer {
    pub fn new(width: u32, height: u32, font: Option<FontVec>) -> Result<Self> {
        let canvas = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("invalid canvas size {width}x{height}"))?;
        if font.is_none() {
            debug!("no font supplied; text will not be drawn");
        }
        Ok(Self {
            layout: Layout::new(width, height),
            canvas,
            text: font.map(|f| TextCache::new(f, INK)),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.canvas = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("invalid canvas size {width}x{height}"))?;
        self.layout = Layout::new(width, height);
        debug!(width, height, "renderer resized");
        Ok(())
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    pub fn canvas(&self) -> &Pixmap {
        &self.canvas
    }

    /// Interns every countdown and progress label a session can show.
    pub fn prepare_labels(budget_secs: u32, trial_count: usize) {
        for secs in 0..=budget_secs {
            intern_text(&format_remaining(secs));
        }
        for n in 1..=trial_count {
            intern_text(&format!("Trial {n} of {trial_count}"));
            intern_text(&format!("Practice {n} of {trial_count}"));
        }
    }

    pub fn render(&mut self, screen: &Screen<'_>) {
        self.canvas.fill(BACKGROUND);
        match screen {
            Screen::Blank => {}
            Screen::Welcome => self.render_welcome(),
            Screen::PracticeIntro { trial_count } => self.render_practice_intro(*trial_count),
            Screen::TestIntro {
                trial_count,
                budget_secs,
            } => self.render_test_intro(*trial_count, *budget_secs),
            Screen::Trial(view) => self.render_trial(view),
            Screen::Results(results) => self.render_results(results),
        }
    }

    /// Copies the canvas into an RGBA8 frame of the same size.
    pub fn copy_to(&self, frame: &mut [u8]) -> Result<()> {
        let data = self.canvas.data();
        if frame.len() != data.len() {
            bail!(
                "frame is {} bytes, canvas is {} bytes",
                frame.len(),
                data.len()
            );
        }
        // the background is opaque, so premultiplied equals straight alpha
        frame.copy_from_slice(data);
        Ok(())
    }

    fn line_height(size: f32) -> f32 {
        size * 1.4
    }

    /// Draws one line centred on `cx` with its top at `top`.
    fn draw_text(&mut self, text: &str, size: f32, cx: f32, top: f32) {
        let Some(cache) = self.text.as_mut() else {
            return;
        };
        let Some(pm) = cache.get_or_render(label(text), size) else {
            return;
        };
        let x = (cx - pm.width() as f32 * 0.5).round() as i32;
        self.canvas.draw_pixmap(
            x,
            top.round() as i32,
            (*pm).as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Draws wrapped text and returns the top of the next line.
    fn draw_paragraph(&mut self, text: &str, size: f32, cx: f32, top: f32, max_w: f32) -> f32 {
        let glyph_w = self
            .text
            .as_ref()
            .map_or(size * 0.55, |c| c.em_width(size).max(1.0));
        let max_chars = (max_w / glyph_w) as usize;
        let mut y = top;
        for line in wrap(text, max_chars) {
            self.draw_text(&line, size, cx, y);
            y += Self::line_height(size);
        }
        y
    }

    fn render_pages(&mut self, title: &str, paragraphs: &[String]) {
        let cx = self.layout.width as f32 * 0.5;
        let max_w = (self.layout.width as f32 - 80.0).min(800.0);
        let mut y = self.layout.height as f32 * 0.15;
        self.draw_text(title, TITLE_PX, cx, y);
        y += Self::line_height(TITLE_PX) * 1.5;
        for p in paragraphs {
            y = self.draw_paragraph(p, BODY_PX, cx, y, max_w);
            y += BODY_PX * 0.8;
        }
    }

    fn render_welcome(&mut self) {
        self.render_pages(
            "Spatial Orientation Test",
            &[
                "This test measures your ability to imagine different perspectives or orientations in space.".into(),
                "You will see a configuration of objects. For each problem, imagine you are standing at one object, facing another, and then point to a third object.".into(),
                "You will use the mouse to draw a line showing the direction to the third object.".into(),
                "Press SPACE BAR or ENTER to begin the practice trials.".into(),
            ],
        );
    }

    fn render_practice_intro(&mut self, trial_count: usize) {
        self.render_pages(
            "Practice Trials",
            &[
                format!("Now you will do {trial_count} practice trials. When each trial appears, move the line to indicate your answer."),
                "Once you have entered your answer the correct answer will be shown in red.".into(),
                "Press SPACE BAR to see the first practice trial.".into(),
            ],
        );
    }

    fn render_test_intro(&mut self, trial_count: usize, budget_secs: u32) {
        let minutes = budget_secs.div_ceil(60);
        self.render_pages(
            "Main Test",
            &[
                format!("Now you will do the test. There are {trial_count} items on this test. You will have {minutes} minutes to complete these items."),
                "Please try to respond accurately, but do not spend too much time on any one item.".into(),
                "When you are ready to start, press ENTER.".into(),
            ],
        );
    }

    fn render_results(&mut self, r: &ResultsView) {
        self.render_pages(
            "Test Completed",
            &[
                "Thank you for completing the Spatial Orientation Test.".into(),
                format!("Average Angular Error: {:.1}°", r.avg_error_deg),
                format!("Average Response Time: {:.1} seconds", r.avg_time_sec),
                format!(
                    "Please copy both numbers separated by a comma (example: {:.1}, {:.1}) and paste them in the survey question that follows.",
                    r.avg_error_deg, r.avg_time_sec
                ),
                "Press SPACE BAR or ENTER to continue.".into(),
            ],
        );
    }

    fn render_trial(&mut self, view: &TrialView<'_>) {
        let layout = self.layout;

        if let Some((n, total)) = view.progress {
            let kind = if view.practice { "Practice" } else { "Trial" };
            let x = layout.scene.x + 80.0;
            self.draw_text(&format!("{kind} {n} of {total}"), BODY_PX, x, 10.0);
        }
        if let Some(secs) = view.remaining_secs {
            let x = layout.width as f32 - 120.0;
            self.draw_text(&format_remaining(secs), BODY_PX, x, 10.0);
        }

        self.render_scene(view);
        self.render_dial(view);

        let cx = layout.scene.center().0;
        let y = self.draw_paragraph(
            &trial_prompt(view.catalog, view.spec),
            BODY_PX,
            cx,
            layout.prompt_top,
            layout.scene.w,
        );
        self.draw_text("Please press ENTER when finished.", BODY_PX, cx, y);
    }

    fn render_scene(&mut self, view: &TrialView<'_>) {
        let layout = self.layout;
        stroke_frame(&mut self.canvas, layout.scene, INK);

        for pos in &view.catalog.positions {
            let at = layout.object_point(pos);
            if pos.object_id == view.spec.standing_id {
                fill_circle(&mut self.canvas, at, STANDING_RADIUS, standing_color());
            } else {
                fill_circle(&mut self.canvas, at, MARKER_RADIUS, marker_color());
            }
            let name = view.catalog.display_name(&pos.object_id).to_string();
            self.draw_text(&name, LABEL_PX, at.0, at.1 + STANDING_RADIUS + 2.0);
        }
    }

    fn render_dial(&mut self, view: &TrialView<'_>) {
        let dial = self.layout.dial;
        let c = (dial.center.x as f32, dial.center.y as f32);
        let r = dial.radius as f32;

        stroke_circle(&mut self.canvas, c, r, INK, 1.5);

        let tip = dial.endpoint(view.response_angle);
        stroke_line(&mut self.canvas, c, (tip.x as f32, tip.y as f32), INK, LINE_WIDTH);

        if let Some(angle) = view.feedback_angle {
            let tip = dial.endpoint(angle);
            let tip = (tip.x as f32, tip.y as f32);
            stroke_line(&mut self.canvas, c, tip, correct_color(), LINE_WIDTH);
        }

        let facing = view.catalog.display_name(&view.spec.facing_id).to_string();
        let standing = view.catalog.display_name(&view.spec.standing_id).to_string();
        self.draw_text(&facing, LABEL_PX, c.0, c.1 - r - LABEL_PX * 1.6);
        self.draw_text(&standing, LABEL_PX, c.0, c.1 + 4.0);
    }
}
