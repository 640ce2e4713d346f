//! Combined log of the texture task: one row per main triple and one per
//! descriptor answer, told apart by the `task` column.

use std::borrow::Cow;
use std::path::Path;

use triplet_core::{StandardPhase, TrialRecord, TrialType};

pub const HEADER: &str =
    "task,trial_num,item1,item2,item3,response_img,reaction_time,stimulus,descriptor";
const MISSING: &str = "NaN";

#[derive(Debug, Clone, PartialEq)]
pub enum TaskRow<'a> {
    Triple {
        trial_num: usize,
        items: [Option<&'a str>; 3],
        response_img: Option<&'a str>,
        rt_ms: u64,
    },
    Descriptor {
        stimulus: Option<&'a str>,
        descriptor: Option<&'a str>,
    },
}

impl TaskRow<'_> {
    pub fn to_line(&self) -> String {
        let fields: [Cow<'_, str>; 9] = match self {
            TaskRow::Triple {
                trial_num,
                items,
                response_img,
                rt_ms,
            } => [
                "triple".into(),
                trial_num.to_string().into(),
                name_or_missing(items[0]),
                name_or_missing(items[1]),
                name_or_missing(items[2]),
                name_or_missing(*response_img),
                format!("{:.3}", *rt_ms as f64 / 1000.0).into(),
                MISSING.into(),
                MISSING.into(),
            ],
            TaskRow::Descriptor {
                stimulus,
                descriptor,
            } => [
                "descriptor".into(),
                MISSING.into(),
                MISSING.into(),
                MISSING.into(),
                MISSING.into(),
                MISSING.into(),
                MISSING.into(),
                name_or_missing(*stimulus),
                quote(descriptor.filter(|d| !d.trim().is_empty()).unwrap_or(MISSING)),
            ],
        };
        fields.join(",")
    }
}

/// File stem of an item path: `img/img4.png` -> `img4`
fn clean_name(path: &str) -> Cow<'_, str> {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or(Cow::Borrowed(path))
}

fn name_or_missing(item: Option<&str>) -> Cow<'_, str> {
    item.map(clean_name).unwrap_or(Cow::Borrowed(MISSING))
}

/// Free text may hold delimiters, so it is quoted when needed.
fn quote(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Main-phase image triples numbered from 1, then descriptor answers, in
/// run order. Practice trials are left out.
pub fn task_rows(records: &[TrialRecord]) -> Vec<TaskRow<'_>> {
    let mut trial_num = 0;
    records
        .iter()
        .filter_map(|record| match (record.phase(), record.trial_type()) {
            (StandardPhase::Trials, TrialType::ImageButtonResponse) => {
                trial_num += 1;
                let items = record.items();
                let item = |i: usize| items.get(i).map(|item| item.as_str());
                Some(TaskRow::Triple {
                    trial_num,
                    items: [item(0), item(1), item(2)],
                    response_img: record
                        .response
                        .chosen_index()
                        .and_then(|i| items.get(i))
                        .map(|item| item.as_str()),
                    rt_ms: record.response.rt,
                })
            }
            (StandardPhase::Descriptor, TrialType::SurveyText) => Some(TaskRow::Descriptor {
                stimulus: record.items().first().map(|item| item.as_str()),
                descriptor: record.response.typed_text(),
            }),
            _ => None,
        })
        .collect()
}

pub fn render_task_log(records: &[TrialRecord]) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for row in task_rows(records) {
        csv.push_str(&row.to_line());
        csv.push('\n');
    }
    csv
}
