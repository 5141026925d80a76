//! Static Helvetica glyph widths and greedy word wrap.
//!
//! Widths come from the standard Helvetica AFM (units of 1/1000 em) and
//! cover ASCII 0x20..=0x7E. Bold text is approximated by scaling the regular
//! table; the wrap only needs to keep lines inside the margins.
//! Index = (char as usize) - 32.

/// Bold glyphs run about 6% wider than regular ones.
const BOLD_SCALE: f32 = 1.06;
/// Fallback for characters outside the table.
const AVERAGE_CHAR_WIDTH: f32 = 0.556;
const SPACE_WIDTH: f32 = 0.278;

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    // sp    !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

/// Measures the rendered width of a string in em units.
pub fn measure_str(s: &str, bold: bool) -> f32 {
    let width: f32 = s
        .chars()
        .map(|c| {
            let code = c as usize;
            if (32..=126).contains(&code) {
                HELVETICA_WIDTHS[code - 32] as f32 / 1000.0
            } else {
                AVERAGE_CHAR_WIDTH
            }
        })
        .sum();
    if bold {
        width * BOLD_SCALE
    } else {
        width
    }
}

/// Greedy word wrap: breaks `text` into lines no wider than `max_width_pt` at
/// `font_size_pt`. A single word wider than the line gets a line of its own.
pub fn wrap_text(text: &str, font_size_pt: f32, max_width_pt: f32, bold: bool) -> Vec<String> {
    let max_width_em = max_width_pt / font_size_pt;
    let space_w = if bold {
        SPACE_WIDTH * BOLD_SCALE
    } else {
        SPACE_WIDTH
    };

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = measure_str(word, bold);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + space_w + word_w > max_width_em {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
