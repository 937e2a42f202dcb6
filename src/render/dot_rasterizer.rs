use crate::core::ScreenPoint;
use crate::render::brush::Brush;
use crate::render::{Color, PixelBuffer};

/// Draws one anti-aliased filled disc of `diameter` pixels centered on `center`.
///
/// Coverage is applied per pixel as it is computed: the solid core (boundary
/// included) overwrites, the falloff ring blends. Pixels outside the buffer
/// are skipped. A non-finite center or diameter, or a diameter `<= 0`, draws
/// nothing.
pub fn draw_dot(target: &mut PixelBuffer, center: ScreenPoint, diameter: f64, color: Color) {
    if !center.x.is_finite() || !center.y.is_finite() || !diameter.is_finite() || diameter <= 0.0
    {
        return;
    }

    let brush = Brush::for_thickness(diameter);
    let reach = brush.reach();
    let bounds = target.bounds();
    let center_x = center.x.round() as i32;
    let center_y = center.y.round() as i32;

    let x_min = center_x.saturating_sub(reach).max(bounds.x);
    let x_max = center_x.saturating_add(reach).min(bounds.right() - 1);
    let y_min = center_y.saturating_sub(reach).max(bounds.y);
    let y_max = center_y.saturating_add(reach).min(bounds.bottom() - 1);

    let packed = color.opaque().packed();
    let stride = target.row_stride();

    for y in y_min..=y_max {
        let dy = f64::from(y) - center.y;
        for x in x_min..=x_max {
            let dx = f64::from(x) - center.x;
            let distance_sq = dx * dx + dy * dy;
            let index = y as usize * stride + x as usize;

            if brush.is_solid(distance_sq, true) {
                target.overwrite_at(index, packed);
                continue;
            }
            let Some(factor) = brush.falloff(distance_sq) else {
                continue;
            };
            let alpha = (255.0 * factor) as u8;
            match alpha {
                0 => {}
                u8::MAX => target.overwrite_at(index, packed),
                alpha => target.blend_at(index, packed, alpha),
            }
        }
    }
}
