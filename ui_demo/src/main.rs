//! Headless UI batching demo
//!
//! Runs the UI batch renderer against the headless backend for a few frames
//! and logs the command streams it emits: a HUD panel, a text readout, a
//! health slider, and a button that reacts to a scripted cursor.

use ember_engine::config::{Config, RenderSettings};
use ember_engine::foundation::math::{Vec2, Vec3, Vec4};
use ember_engine::gfx::headless::{HeadlessCommandList, HeadlessEngine};
use ember_engine::gfx::EngineContext;
use ember_engine::ui::{
    build_quad, build_slider, build_text, Anchor, Button, FontAtlas, FontMetrics, QuadParams,
    SliderParams, TextStyle, UiRenderer, ViewportConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let settings = match RenderSettings::load_from_file("render_settings.toml") {
        Ok(settings) => settings,
        Err(err) => {
            log::info!("no render_settings.toml ({err}), using defaults");
            RenderSettings::default()
        }
    };

    let engine = HeadlessEngine::new(settings.max_frames_in_flight);
    let mut ui = UiRenderer::new(&engine, "demo", settings.ui.max_quad_count)?;
    let viewport = ViewportConfig::new(1280.0, 720.0);

    let panel_atlas = engine.headless_device().create_texture_view("panel_atlas");
    let font_view = engine.headless_device().create_texture_view("font_atlas");
    let font = FontAtlas::loaded(
        "mono8x16",
        FontMetrics {
            texture_width: 128.0,
            texture_height: 96.0,
            glyph_width: 8.0,
            glyph_height: 16.0,
            first_char: ' ',
            glyphs_per_row: 16,
        },
    );

    let button_pos = Anchor::BottomCenter.resolve(Vec2::new(0.0, 120.0), viewport);
    let mut button = Button::new(
        Vec3::new(button_pos.x, button_pos.y, 0.0),
        Vec2::new(160.0, 48.0),
    );
    // Scripted cursor: approach, press, release on the button.
    let cursor_frames = [
        (100.0_f32, 100.0_f32, false),
        (button_pos.x, button_pos.y, false),
        (button_pos.x, button_pos.y, true),
        (button_pos.x, button_pos.y, false),
    ];

    for (frame, &(cx, cy, mouse_down)) in cursor_frames.iter().enumerate() {
        let frame_index = engine.current_frame_index();
        ui.begin_frame(frame_index)?;

        if button.update_state(cx, cy, mouse_down) {
            log::info!("frame {frame}: button clicked");
        }

        let panel_pos = Anchor::TopCenter.resolve(Vec2::new(0.0, -100.0), viewport);
        let panel = build_quad(
            &QuadParams::screen(
                Vec3::new(panel_pos.x, panel_pos.y, 0.0),
                Vec2::new(400.0, 120.0),
            )
            .with_color(Vec4::new(0.1, 0.1, 0.15, 0.85)),
            viewport,
        );
        ui.submit(&[panel, button.background_quad(viewport)], panel_atlas.clone())?;

        let health = 1.0 - frame as f32 * 0.2;
        let slider_pos = Anchor::TopCenter.resolve(Vec2::new(0.0, -130.0), viewport);
        ui.submit(
            &build_slider(
                &SliderParams {
                    center: Vec3::new(slider_pos.x, slider_pos.y, 0.0),
                    size: Vec2::new(320.0, 18.0),
                    value: health,
                    ..Default::default()
                },
                viewport,
            ),
            panel_atlas.clone(),
        )?;

        let text_pos = Anchor::TopCenter.resolve(Vec2::new(-160.0, -60.0), viewport);
        let text = build_text(
            &font,
            &format!("health {:>3.0}%", health * 100.0),
            Vec3::new(text_pos.x, text_pos.y, 0.0),
            &TextStyle::default(),
            viewport,
        )?;
        ui.submit(&text, font_view.clone())?;

        let mut cmd = HeadlessCommandList::new();
        ui.draw(&mut cmd);
        log::info!(
            "frame {frame} (slot {frame_index}): {} commands, {} draws",
            cmd.commands().len(),
            cmd.draw_commands().len()
        );

        engine.advance_frame();
    }

    Ok(())
}
