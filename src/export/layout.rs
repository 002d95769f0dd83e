//! Placement of the logo and its backdrop on the export surface

/// Axis-aligned square in surface pixels. The origin may be negative when a
/// backdrop spills past the surface edge; drawing clips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Edge length
    pub edge: u32,
}

impl Square {
    /// Center point, rounded down
    pub fn center(&self) -> (i32, i32) {
        let half = (self.edge / 2) as i32;
        (self.x + half, self.y + half)
    }

    /// Whether `other` lies strictly inside `self` on every side
    pub fn strictly_contains(&self, other: &Square) -> bool {
        let right = self.x as i64 + self.edge as i64;
        let other_right = other.x as i64 + other.edge as i64;
        let bottom = self.y as i64 + self.edge as i64;
        let other_bottom = other.y as i64 + other.edge as i64;
        self.x < other.x && self.y < other.y && right > other_right && bottom > other_bottom
    }
}

/// Where the logo and its white backdrop go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoLayout {
    /// Square the logo is scaled into
    pub logo: Square,
    /// White square behind the logo, `padding` larger on every side
    pub backdrop: Square,
}

/// Center a logo occupying `percent` of `surface_edge` on the surface.
///
/// The backdrop extends at least one pixel past the logo on every side.
/// Returns `None` when the logo would be smaller than one pixel.
pub fn logo_layout(surface_edge: u32, percent: u8, padding: u32) -> Option<LogoLayout> {
    let percent = u64::from(percent.min(100));
    let logo_edge = ((u64::from(surface_edge) * percent + 50) / 100) as u32;
    if logo_edge == 0 {
        return None;
    }

    let offset = ((surface_edge - logo_edge) / 2) as i32;
    let logo = Square {
        x: offset,
        y: offset,
        edge: logo_edge,
    };

    let pad = padding.clamp(1, i32::MAX as u32 / 4) as i32;
    let backdrop = Square {
        x: offset - pad,
        y: offset - pad,
        edge: logo_edge.saturating_add(2 * pad as u32),
    };

    Some(LogoLayout { logo, backdrop })
}
