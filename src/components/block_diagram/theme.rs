//! Colors and fonts used when painting blocks on a canvas.

use super::types::NodeKind;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Surface background.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Secondary color for the radial gradient
	pub color_secondary: Color,
	pub use_gradient: bool,
}

/// Block rectangle style.
#[derive(Clone, Debug)]
pub struct BlockStyle {
	pub fill: Color,
	pub border_color: Color,
	pub border_width: f64,
	pub corner_radius: f64,
	/// Width of the colored strip on the left edge that marks the node kind.
	pub accent_width: f64,
	/// Fill while a block is being dragged
	pub drag_alpha: f64,
}

/// Block label style. Offsets are relative to the block's top-left corner.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	pub title_font: String,
	pub title_color: Color,
	pub subtitle_font: String,
	pub subtitle_color: Color,
	pub inset_x: f64,
	pub title_y: f64,
	pub subtitle_y: f64,
}

/// Edge line style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	pub width: f64,
	/// Dash pattern (dash, gap) for process relations; product relations are solid.
	pub process_dash: (f64, f64),
}

/// Complete visual style of a diagram.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub block: BlockStyle,
	pub label: LabelStyle,
	pub edge: EdgeStyle,
}

impl Theme {
	/// Accent color marking a node kind.
	pub fn accent(&self, kind: NodeKind) -> Color {
		match kind {
			NodeKind::Capability => Color::rgb(25, 118, 210),
			NodeKind::Product => Color::rgb(46, 125, 50),
			NodeKind::Team => Color::rgb(0, 131, 143),
			NodeKind::Pipeline => Color::rgb(230, 81, 0),
			NodeKind::ArchitectureSystem => Color::rgb(123, 31, 162),
			NodeKind::ArchitectureComponent => Color::rgb(69, 90, 100),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(248, 250, 252),
				color_secondary: Color::rgb(255, 255, 255),
				use_gradient: true,
			},
			block: BlockStyle {
				fill: Color::rgb(240, 244, 248),
				border_color: Color::rgb(51, 65, 85),
				border_width: 1.0,
				corner_radius: 6.0,
				accent_width: 4.0,
				drag_alpha: 0.5,
			},
			label: LabelStyle {
				title_font: "600 14px sans-serif".to_string(),
				title_color: Color::rgb(30, 41, 59),
				subtitle_font: "12px sans-serif".to_string(),
				subtitle_color: Color::rgb(100, 116, 139),
				inset_x: 12.0,
				title_y: 24.0,
				subtitle_y: 44.0,
			},
			edge: EdgeStyle {
				color: Color::rgb(102, 102, 102),
				width: 2.0,
				process_dash: (6.0, 4.0),
			},
		}
	}
}
