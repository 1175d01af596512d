use super::PanelText;
use crate::patch::{FieldId, PatchStore, PlayMode};

/// Operator topology of each algorithm; `>` modulates, `~` is an output.
pub const ALGORITHM_NAMES: [&str; 8] = [
    "1 > 2 > 3 > 4~",
    "1 & 2 > 3 > 4~",
    "(2 > 3) & 1 > 4~",
    "(1 > 2) & 3 > 4~",
    "1 > 2~, 3 > 4~",
    "1 > (2 & 3 & 4)~",
    "1 > 3~, 2~, 4~",
    "1~, 2~, 3~, 4~",
];

/// SSG-EG envelope types, index 0 is off.
pub const SSG_EG_NAMES: [&str; 9] = [
    "OFF",
    "forward loop",
    "one shot + low",
    "forward+rev loop",
    "one shot + high",
    "reverse loop",
    "reverse + high",
    "rev+forward loop",
    "reverse + low",
];

/// LFO frequencies, index 0 is off.
pub const LFO_FREQUENCY_NAMES: [&str; 9] = [
    "OFF", "3.82 Hz", "5.33 Hz", "5.77 Hz", "6.11 Hz", "6.60 Hz", "9.23 Hz", "46.11 Hz", "69.22 Hz",
];

/// Boolean labels.
pub const ON_OFF: [&str; 2] = ["OFF", "ON"];

/// Two-line description of `field` with its current value.
///
/// ```
/// use megamega::panel::describe;
/// use megamega::{FieldId, Operator, PatchStore};
///
/// let store = PatchStore::default();
/// let text = describe(FieldId::Multiple(Operator::ALL[1]), &store);
/// assert_eq!(text.line1(), "op 2 freq mult:");
/// assert_eq!(text.line2(), "0.5");
/// ```
pub fn describe(field: FieldId, store: &PatchStore) -> PanelText {
    let value = store.get(field);
    let label = field.label();

    match field {
        FieldId::Preset => PanelText::format(
            format_args!("{}:", label),
            format_args!("{}", store.preset_name()),
        ),
        FieldId::Polyphony => PanelText::format(
            format_args!("{}:", label),
            format_args!("{}", PlayMode::from_value(value).name()),
        ),
        FieldId::Algorithm => PanelText::format(
            format_args!("{} {}:", label, value + 1),
            format_args!("{}", name(&ALGORITHM_NAMES, value)),
        ),
        FieldId::LfoFrequency => PanelText::format(
            format_args!("{}:", label),
            format_args!("{}", name(&LFO_FREQUENCY_NAMES, value)),
        ),
        FieldId::Multiple(op) if value == 0 => {
            PanelText::format(format_args!("op {} {}:", op.number(), label), format_args!("0.5"))
        }
        FieldId::Ssgeg(op) => PanelText::format(
            format_args!("op {} {}:", op.number(), label),
            format_args!("{}", name(&SSG_EG_NAMES, value)),
        ),
        FieldId::AmEnable(op) => PanelText::format(
            format_args!("op {} {}:", op.number(), label),
            format_args!("{}", name(&ON_OFF, value)),
        ),
        _ => match field.operator() {
            Some(op) => PanelText::format(
                format_args!("op {} {}:", op.number(), label),
                format_args!("{}", value),
            ),
            None => PanelText::format(format_args!("{}:", label), format_args!("{}", value)),
        },
    }
}

fn name(table: &[&'static str], value: i16) -> &'static str {
    usize::try_from(value)
        .ok()
        .and_then(|i| table.get(i))
        .copied()
        .unwrap_or("?")
}
