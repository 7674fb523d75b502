pub type Color = [f32; 3];

/// Total number of palette slots available to one layout session.
pub const PALETTE_LEN: usize = 90;

/// Assigned once the palette runs out of distinct slots.
pub const FALLBACK_COLOR: Color = [0.5, 0.5, 0.5];

/// 30 distinct base hues; slots cycle through them in three brightness
/// tiers (full, darkened, pastel) for 90 entries overall.
const BASE_COLORS: [Color; 30] = [
    [1.0, 0.0, 0.0],   // red
    [1.0, 0.5, 0.0],   // orange
    [1.0, 1.0, 0.0],   // yellow
    [0.5, 1.0, 0.0],   // lime
    [0.0, 1.0, 0.0],   // green
    [0.0, 1.0, 0.5],   // emerald
    [0.0, 1.0, 1.0],   // cyan
    [0.0, 0.5, 1.0],   // sky blue
    [0.0, 0.0, 1.0],   // blue
    [0.5, 0.0, 1.0],   // indigo
    [1.0, 0.0, 1.0],   // violet
    [1.0, 0.0, 0.5],   // magenta
    [1.0, 0.5, 0.5],   // pink
    [1.0, 0.5, 0.3],   // coral
    [1.0, 0.6, 0.5],   // salmon
    [1.0, 0.8, 0.0],   // gold
    [0.5, 0.5, 0.0],   // olive
    [0.0, 0.5, 0.5],   // teal
    [0.0, 1.0, 0.8],   // turquoise
    [0.8, 0.8, 1.0],   // lavender
    [0.5, 0.0, 0.5],   // plum
    [0.5, 0.0, 0.0],   // maroon
    [0.8, 0.0, 0.2],   // crimson
    [1.0, 0.8, 0.6],   // peach
    [0.6, 1.0, 0.8],   // mint
    [0.5, 0.8, 1.0],   // azure
    [1.0, 0.7, 0.2],   // amber
    [0.8, 0.6, 1.0],   // lilac
    [1.0, 0.4, 0.7],   // rose
    [0.75, 0.75, 0.75], // silver
];

/// The color stored in a given palette slot. Slots cycle through the base
/// hues; the exhaustion rule lives with the assignment table, not here.
pub fn palette_color(slot: usize) -> Color {
    let base = BASE_COLORS[slot % BASE_COLORS.len()];
    match (slot / BASE_COLORS.len()) % 3 {
        0 => base,
        1 => scale(base, 0.55),
        _ => tint(base),
    }
}

fn scale(color: Color, factor: f32) -> Color {
    [color[0] * factor, color[1] * factor, color[2] * factor]
}

fn tint(color: Color) -> Color {
    [
        color[0] * 0.5 + 0.5,
        color[1] * 0.5 + 0.5,
        color[2] * 0.5 + 0.5,
    ]
}
