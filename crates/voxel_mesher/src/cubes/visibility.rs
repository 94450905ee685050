//! Face visibility classifier.
//!
//! Compares the opacity rank of two cells adjacent along the swept axis. The
//! raw value never decides visibility; it only selects the payload.
//!
//! ```text
//!   near (d)   far (d+1)        result
//!   ────────   ─────────        ──────────────────────────────
//!   rank a  ==  rank b      →   no face
//!   rank a  >   rank b      →   Positive: near owns it, normal +axis
//!   rank a  <   rank b      →   Negative: far owns it, normal -axis
//! ```

/// Opacity rank from alpha: 0 transparent, 1 translucent, 2 opaque.
#[inline(always)]
pub const fn alpha_rank(alpha: u8) -> u8 {
  (alpha == 255) as u8 + (alpha > 0) as u8
}

/// Orientation of a visible face relative to the swept axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
  /// Owned by the near cell, normal along +axis.
  Positive,
  /// Owned by the far cell, normal along -axis.
  Negative,
}

impl Facing {
  #[inline]
  pub fn is_positive(self) -> bool {
    matches!(self, Facing::Positive)
  }
}

/// Classify the boundary between a near and a far cell by their ranks.
#[inline(always)]
pub fn classify(near_rank: u8, far_rank: u8) -> Option<Facing> {
  match near_rank.cmp(&far_rank) {
    std::cmp::Ordering::Equal => None,
    std::cmp::Ordering::Greater => Some(Facing::Positive),
    std::cmp::Ordering::Less => Some(Facing::Negative),
  }
}
