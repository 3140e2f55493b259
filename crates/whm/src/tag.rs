//! The closed tag set of the in-game hypertext dialect.

/// Element tags. The serialized form stores a tag id *and* a tag-name
/// string; the id is authoritative. `Text` and `ScriptObject` are
/// pseudo-tags whose name slot carries content instead, and `Style` never
/// reaches the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Tag {
    Html = 0,
    Title = 1,
    A = 2,
    Body = 3,
    B = 4,
    Br = 5,
    Center = 6,
    Code = 7,
    Dl = 8,
    Dt = 9,
    Dd = 10,
    Div = 11,
    Embed = 12,
    Em = 13,
    Head = 14,
    H1 = 15,
    H2 = 16,
    H3 = 17,
    H4 = 18,
    H5 = 19,
    H6 = 20,
    Img = 21,
    I = 22,
    Link = 23,
    Li = 24,
    Meta = 25,
    Object = 26,
    Ol = 27,
    P = 28,
    Param = 29,
    Span = 30,
    Strong = 31,
    Style = 32,
    Table = 33,
    Tr = 34,
    Th = 35,
    Td = 36,
    Ul = 37,
    Text = 38,
    ScriptObject = 39,
}

impl Tag {
    pub fn from_raw(raw: u32) -> Option<Self> {
        use Tag::*;
        Some(match raw {
            0 => Html,
            1 => Title,
            2 => A,
            3 => Body,
            4 => B,
            5 => Br,
            6 => Center,
            7 => Code,
            8 => Dl,
            9 => Dt,
            10 => Dd,
            11 => Div,
            12 => Embed,
            13 => Em,
            14 => Head,
            15 => H1,
            16 => H2,
            17 => H3,
            18 => H4,
            19 => H5,
            20 => H6,
            21 => Img,
            22 => I,
            23 => Link,
            24 => Li,
            25 => Meta,
            26 => Object,
            27 => Ol,
            28 => P,
            29 => Param,
            30 => Span,
            31 => Strong,
            32 => Style,
            33 => Table,
            34 => Tr,
            35 => Th,
            36 => Td,
            37 => Ul,
            38 => Text,
            39 => ScriptObject,
            _ => return None,
        })
    }

    /// The HTML tag name to emit. The content pseudo-tags render as spans.
    pub fn as_str(self) -> &'static str {
        use Tag::*;
        match self {
            Html => "html",
            Title => "title",
            A => "a",
            Body => "body",
            B => "b",
            Br => "br",
            Center => "center",
            Code => "code",
            Dl => "dl",
            Dt => "dt",
            Dd => "dd",
            Div => "div",
            Embed => "embed",
            Em => "em",
            Head => "head",
            H1 => "h1",
            H2 => "h2",
            H3 => "h3",
            H4 => "h4",
            H5 => "h5",
            H6 => "h6",
            Img => "img",
            I => "i",
            Link => "link",
            Li => "li",
            Meta => "meta",
            Object => "object",
            Ol => "ol",
            P => "p",
            Param => "param",
            Span => "span",
            Strong => "strong",
            Style => "style",
            Table => "table",
            Tr => "tr",
            Th => "th",
            Td => "td",
            Ul => "ul",
            Text | ScriptObject => "span",
        }
    }
}
