//! Line tokenizer and classifier.
//!
//! Turns one trimmed G-code line into a [`ClassifiedLine`]. Malformed numeric
//! words are dropped here so the state machine keeps its prior value.

use super::line_type::LineType;

/// Marker that announces a region type
pub const TYPE_MARKER: &str = ";TYPE:";
/// Region terminator, ignored for classification
pub const TYPE_END_MARKER: &str = ";TYPE:end";
/// Running print time in seconds
pub const TIME_ELAPSED_MARKER: &str = ";TIME_ELAPSED:";

/// Motion command family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCode {
    /// G0
    Rapid,
    /// G1
    Linear,
    /// G2
    ArcCw,
    /// G3
    ArcCcw,
}

impl MotionCode {
    pub fn is_arc(&self) -> bool {
        matches!(self, MotionCode::ArcCw | MotionCode::ArcCcw)
    }
}

/// Parsed words of a G0/G1/G2/G3 command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCommand {
    pub code: MotionCode,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
    pub e: Option<f32>,
    pub f: Option<f32>,
    pub i: Option<f32>,
    pub j: Option<f32>,
    pub p: Option<f32>,
}

impl MotionCommand {
    pub fn new(code: MotionCode) -> Self {
        Self {
            code,
            x: None,
            y: None,
            z: None,
            e: None,
            f: None,
            i: None,
            j: None,
            p: None,
        }
    }

    /// Whether any axis word was present
    pub fn has_axis_word(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some()
    }

    /// Extrusion word of a linear move (`E`, or `P` as an alias)
    pub fn extrusion_word(&self) -> Option<f32> {
        self.e.or(self.p)
    }
}

/// Heater targeted by a thermal command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heater {
    Nozzle,
    Bed,
    Chamber,
}

/// Fan slot addressed by `M106`/`M107`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanSlot {
    /// Part cooling fan (`P0` or no `P`)
    Primary,
    /// Auxiliary fan (`P1`)
    Auxiliary,
    /// Chamber/exhaust fan (`P2`, `P3`)
    Chamber,
}

impl FanSlot {
    fn from_index(index: Option<f32>) -> FanSlot {
        match index.map(|p| p as i32) {
            Some(1) => FanSlot::Auxiliary,
            Some(2) | Some(3) => FanSlot::Chamber,
            _ => FanSlot::Primary,
        }
    }
}

/// Temperature or fan update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThermalCommand {
    Temperature { heater: Heater, value: f32 },
    Fan { slot: FanSlot, speed: f32 },
}

/// What a line does once the type marker is set aside
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    Motion(MotionCommand),
    ToolChange(usize),
    Thermal(ThermalCommand),
    TimeElapsed(f32),
    /// `G92`; carries the new extrusion position
    ResetExtrusion(f32),
    Other,
}

/// Result of classifying one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedLine {
    /// Set when the line carries a `;TYPE:` marker other than `;TYPE:end`
    pub type_marker: Option<LineType>,
    pub kind: LineKind,
}

/// Classify a single trimmed, non-empty line
pub fn classify_line(line: &str) -> ClassifiedLine {
    let type_marker = if line.contains(TYPE_MARKER) && !line.contains(TYPE_END_MARKER) {
        Some(LineType::from_type_comment(line))
    } else {
        None
    };

    ClassifiedLine {
        type_marker,
        kind: classify_kind(line),
    }
}

fn classify_kind(line: &str) -> LineKind {
    if let Some(rest) = line.strip_prefix(TIME_ELAPSED_MARKER) {
        return match rest.trim().parse::<f32>() {
            Ok(seconds) => LineKind::TimeElapsed(seconds),
            Err(_) => LineKind::Other,
        };
    }

    let code = strip_comment(line);
    let mut words = code.split_whitespace();
    let Some(command) = words.next() else {
        return LineKind::Other;
    };

    let Some(letter) = command.chars().next() else {
        return LineKind::Other;
    };
    let Some(number) = extract_command_num(&command[letter.len_utf8()..]) else {
        return LineKind::Other;
    };

    match letter.to_ascii_uppercase() {
        'G' => classify_g(number, words),
        'M' => classify_m(number, words),
        'T' => LineKind::ToolChange(number as usize),
        _ => LineKind::Other,
    }
}

fn classify_g<'a>(number: u32, words: impl Iterator<Item = &'a str> + 'a) -> LineKind {
    let code = match number {
        0 => MotionCode::Rapid,
        1 => MotionCode::Linear,
        2 => MotionCode::ArcCw,
        3 => MotionCode::ArcCcw,
        92 => {
            let e = parse_words(words)
                .find(|(letter, _)| *letter == 'E')
                .map(|(_, value)| value);
            return LineKind::ResetExtrusion(e.unwrap_or(0.0));
        }
        _ => return LineKind::Other,
    };

    let mut command = MotionCommand::new(code);
    for (letter, value) in parse_words(words) {
        match letter {
            'X' => command.x = Some(value),
            'Y' => command.y = Some(value),
            'Z' => command.z = Some(value),
            'E' => command.e = Some(value),
            'F' => command.f = Some(value),
            'I' => command.i = Some(value),
            'J' => command.j = Some(value),
            'P' => command.p = Some(value),
            _ => {}
        }
    }
    LineKind::Motion(command)
}

fn classify_m<'a>(number: u32, words: impl Iterator<Item = &'a str> + 'a) -> LineKind {
    let mut s = None;
    let mut p = None;
    for (letter, value) in parse_words(words) {
        match letter {
            'S' => s = Some(value),
            'P' => p = Some(value),
            _ => {}
        }
    }

    let heater = match number {
        104 | 109 => Some(Heater::Nozzle),
        140 | 190 => Some(Heater::Bed),
        141 | 191 => Some(Heater::Chamber),
        _ => None,
    };
    if let Some(heater) = heater {
        return match s {
            Some(value) => LineKind::Thermal(ThermalCommand::Temperature { heater, value }),
            None => LineKind::Other,
        };
    }

    match (number, s) {
        (106, Some(speed)) => LineKind::Thermal(ThermalCommand::Fan {
            slot: FanSlot::from_index(p),
            speed,
        }),
        (107, _) => LineKind::Thermal(ThermalCommand::Fan {
            slot: FanSlot::from_index(p),
            speed: 0.0,
        }),
        _ => LineKind::Other,
    }
}

/// Drop a trailing `;` comment
pub fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Extract the command number from the text after the letter
/// (e.g. "01" -> Some(1), "28" -> Some(28), "1.5" -> None)
fn extract_command_num(after_letter: &str) -> Option<u32> {
    let end_idx = after_letter
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after_letter.len());

    if end_idx == 0 || end_idx != after_letter.len() {
        return None;
    }

    after_letter[..end_idx].parse::<u32>().ok()
}

/// Parse `<letter><number>` words, skipping any that do not parse
pub fn parse_words<'a>(
    words: impl Iterator<Item = &'a str> + 'a,
) -> impl Iterator<Item = (char, f32)> + 'a {
    words.filter_map(|part| {
        let first_char = part.chars().next()?;
        if part.len() < 2 || !first_char.is_ascii_alphabetic() {
            return None;
        }
        let value = part[1..].parse::<f32>().ok()?;
        Some((first_char.to_ascii_uppercase(), value))
    })
}
