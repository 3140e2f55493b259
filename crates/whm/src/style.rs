//! Per-node render state: the flat layout/style record attached to every
//! element, and the closed token set its enumerated fields draw from.

/// Enumerated style tokens. Fields holding a token outside this set are
/// treated as unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum AttrValue {
    Left = 0,
    Right = 1,
    Center = 2,
    Justify = 3,
    Top = 4,
    Bottom = 5,
    Middle = 6,
    Inherit = 7,
    XxSmall = 8,
    XSmall = 9,
    Small = 10,
    Medium = 11,
    Large = 12,
    XLarge = 13,
    XxLarge = 14,
    Block = 15,
    Table = 16,
    TableCell = 17,
    Inline = 18,
    None = 19,
    Solid = 20,
    Underline = 21,
    Overline = 22,
    LineThrough = 23,
    Blink = 24,
    Repeat = 25,
    NoRepeat = 26,
    RepeatX = 27,
    RepeatY = 28,
    Collapse = 29,
    Separate = 30,
}

impl AttrValue {
    pub fn from_raw(raw: u32) -> Option<Self> {
        use AttrValue::*;
        Some(match raw {
            0 => Left,
            1 => Right,
            2 => Center,
            3 => Justify,
            4 => Top,
            5 => Bottom,
            6 => Middle,
            7 => Inherit,
            8 => XxSmall,
            9 => XSmall,
            10 => Small,
            11 => Medium,
            12 => Large,
            13 => XLarge,
            14 => XxLarge,
            15 => Block,
            16 => Table,
            17 => TableCell,
            18 => Inline,
            19 => None,
            20 => Solid,
            21 => Underline,
            22 => Overline,
            23 => LineThrough,
            24 => Blink,
            25 => Repeat,
            26 => NoRepeat,
            27 => RepeatX,
            28 => RepeatY,
            29 => Collapse,
            30 => Separate,
            _ => return Option::None,
        })
    }

    /// The CSS spelling of this token. In-game font-size keywords were tuned
    /// for a television screen, so they map to fixed pixel sizes.
    pub fn css(self) -> &'static str {
        use AttrValue::*;
        match self {
            Left => "left",
            Right => "right",
            Center => "center",
            Justify => "justify",
            Top => "top",
            Bottom => "bottom",
            Middle => "middle",
            Inherit => "inherit",
            XxSmall => "6px",
            XSmall => "7px",
            Small => "8px",
            Medium => "9px",
            Large => "11px",
            XLarge => "12px",
            XxLarge => "14px",
            Block => "block",
            Table => "table",
            TableCell => "table-cell",
            Inline => "inline",
            None => "none",
            Solid => "solid",
            Underline => "underline",
            Overline => "overline",
            LineThrough => "line-through",
            Blink => "blink",
            Repeat => "repeat",
            NoRepeat => "no-repeat",
            RepeatX => "repeat-x",
            RepeatY => "repeat-y",
            Collapse => "collapse",
            Separate => "separate",
        }
    }
}

/// One border side: 24-bit RGB color, line style, width in pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Border {
    pub color: u32,
    pub style: Option<AttrValue>,
    pub width: f32,
}

/// Per-side box metrics (margins, paddings).
#[derive(Debug, Clone, Copy, Default)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// The 0xC4-byte render-state record carried by every node. Colors pack
/// 24-bit RGB into the low bytes of a 32-bit word; the top byte is ignored.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub display: Option<AttrValue>,
    pub width: f32,
    pub height: f32,

    pub background_color: u32,
    /// System-segment offset of the background texture record, zero if none.
    pub background_image_offset: u32,
    /// Resolved texture name, populated when the offset is non-zero.
    pub background_image: String,
    pub background_repeat: Option<AttrValue>,
    pub has_background: bool,

    pub color: u32,
    pub link_color: u32,

    pub h_align: Option<AttrValue>,
    pub v_align: Option<AttrValue>,
    pub text_decoration: Option<AttrValue>,
    pub font_size: Option<AttrValue>,
    pub font_style: i32,
    pub font_weight: i32,

    pub border_top: Border,
    pub border_right: Border,
    pub border_bottom: Border,
    pub border_left: Border,

    pub margin: Edges,
    pub padding: Edges,

    pub cell_padding: f32,
    pub cell_spacing: f32,
    pub col_span: i32,
    pub row_span: i32,
}
