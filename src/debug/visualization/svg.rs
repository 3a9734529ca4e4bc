// src/debug/visualization/svg.rs
use crate::math::types::{Bounds2D, Path as Loop};
use crate::scene::geometry::{VisibilityResult, WallResult};
use bevy::log::info;
use ::svg::Document;
use ::svg::node::element::path::Data;
use ::svg::node::element::{Circle, Path, Rectangle, Style};

// ===================================================================================
// HILFS-STRUCT für die SVG-Erstellung
// ===================================================================================
/// Ein Helfer zum Erstellen einer SVG-Szene auf Basis von `svg::Document`.
struct SvgBuilder {
    document: Document,
    point_radius: f64,
}

impl SvgBuilder {
    /// Erstellt ein neues SVG-Grundgerüst mit Stil und Hintergrund.
    /// Kartenkoordinaten haben bereits y nach unten und passen direkt in die ViewBox.
    fn new(display_bounds: &Bounds2D, svg_pixel_size: f64) -> Self {
        let min_x = display_bounds.min.x as f64;
        let min_y = display_bounds.min.y as f64;
        let width = display_bounds.width() as f64;
        let height = display_bounds.height() as f64;

        let stroke_w_normal = (width + height) / 2.0 * 0.004;
        let stroke_w_thin = (width + height) / 2.0 * 0.002;
        let point_radius = (width + height) / 2.0 * 0.01;

        let style = Style::new(format!(
            r#"
    .background {{ fill: #f0f0f0; }}
    .wall {{ fill: #555555; fill-rule: evenodd; stroke: #222222; stroke-width: {stroke_w_thin}; }}
    .fog {{ fill: rgba(20, 20, 60, 0.6); fill-rule: evenodd; stroke: none; }}
    .sight {{ fill: rgba(255, 230, 120, 0.35); stroke: #d4a000; stroke-width: {stroke_w_normal}; }}
    .viewer {{ fill: #cc0000; stroke: white; stroke-width: {stroke_w_thin}; }}
"#
        ));

        let background = Rectangle::new()
            .set("x", min_x.to_string())
            .set("y", min_y.to_string())
            .set("width", width.to_string())
            .set("height", height.to_string())
            .set("class", "background");

        let document = Document::new()
            .set("width", svg_pixel_size.to_string())
            .set("height", svg_pixel_size.to_string())
            .set("viewBox", format!("{min_x} {min_y} {width} {height}"))
            .add(style)
            .add(background);

        Self {
            document,
            point_radius,
        }
    }

    /// Zeichnet alle Loops als einen Pfad; mit `evenodd` werden verschachtelte Loops zu Löchern.
    fn draw_loops(mut self, loops: &[Loop], class: &str) -> Self {
        let mut data = Data::new();
        let mut has_points = false;
        for ring in loops.iter().filter(|ring| ring.len() >= 3) {
            data = data.move_to((ring[0].x, ring[0].y));
            for point in &ring[1..] {
                data = data.line_to((point.x, point.y));
            }
            data = data.close();
            has_points = true;
        }

        if has_points {
            self.document = self.document.add(
                Path::new()
                    .set("class", class)
                    .set("fill-rule", "evenodd")
                    .set("d", data),
            );
        }
        self
    }

    fn draw_circle(mut self, x: f32, y: f32, class: &str) -> Self {
        self.document = self.document.add(
            Circle::new()
                .set("cx", x.to_string())
                .set("cy", y.to_string())
                .set("r", self.point_radius.to_string())
                .set("class", class),
        );
        self
    }

    fn finish(self) -> Document {
        self.document
    }
}

/// Erstellt ein SVG mit Wänden, Nebel und Sichtpolygon.
///
/// # Arguments
/// * `walls` - Die Wandgeometrie der Karte; ihre Bounds bestimmen die ViewBox.
/// * `visibility` - Optionales Sichtergebnis; ohne wird nur die Karte gezeichnet.
/// * `svg_pixel_size` - Die Größe der SVG in Pixeln (Breite und Höhe).
pub fn render_scene_svg(
    walls: &WallResult,
    visibility: Option<&VisibilityResult>,
    svg_pixel_size: f64,
) -> Document {
    let display_bounds = if walls.bounds.is_empty() {
        Bounds2D::from_points(bevy::math::Vec2::ZERO, bevy::math::Vec2::ONE)
    } else {
        walls.bounds.expand(walls.bounds.width().max(walls.bounds.height()) * 0.02)
    };

    let mut svg = SvgBuilder::new(&display_bounds, svg_pixel_size).draw_loops(&walls.loops, "wall");

    if let Some(visibility) = visibility {
        svg = svg
            .draw_loops(&visibility.fog_loops(), "fog")
            .draw_loops(std::slice::from_ref(&visibility.polygon), "sight")
            .draw_circle(visibility.viewer.x, visibility.viewer.y, "viewer");
    }

    svg.finish()
}

/// Speichert die Szene als SVG-Datei.
#[cfg(debug_assertions)]
pub fn save_scene_svg(
    filename: &str,
    walls: &WallResult,
    visibility: Option<&VisibilityResult>,
    svg_pixel_size: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = render_scene_svg(walls, visibility, svg_pixel_size);
    ::svg::save(filename, &document)?;
    info!("Debug SVG '{}' wurde erstellt.", filename);
    Ok(())
}
