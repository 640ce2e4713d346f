use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::info;
use triplet_core::{TrialRecord, TrialType};

use crate::error::ExportError;

pub const HEADER: &str = "item1,item2,item3,response,rt";
pub const MIME_TYPE: &str = "text/csv";

/// One image trial projected onto the export columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow<'a> {
    pub item1: &'a str,
    pub item2: &'a str,
    pub item3: &'a str,
    /// Item at the chosen index; empty when it cannot be resolved
    pub response: &'a str,
    pub rt: u64,
}

impl<'a> CsvRow<'a> {
    pub fn from_record(record: &'a TrialRecord) -> Self {
        let items = record.items();
        let column = |i: usize| items.get(i).map(|item| item.as_str()).unwrap_or_default();
        let response = record
            .response
            .chosen_index()
            .and_then(|i| items.get(i))
            .map(|item| item.as_str())
            .unwrap_or_default();

        Self {
            item1: column(0),
            item2: column(1),
            item3: column(2),
            response,
            rt: record.response.rt,
        }
    }

    /// Comma-joined fields. Nothing is quoted, so a comma inside an item
    /// shifts the columns.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.item1, self.item2, self.item3, self.response, self.rt
        )
    }
}

/// Rows for the image trials only, in run order
pub fn rows(records: &[TrialRecord]) -> impl Iterator<Item = CsvRow<'_>> {
    records
        .iter()
        .filter(|r| r.trial_type() == TrialType::ImageButtonResponse)
        .map(CsvRow::from_record)
}

pub fn render_csv(records: &[TrialRecord]) -> String {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for row in rows(records) {
        csv.push_str(&row.to_line());
        csv.push('\n');
    }
    csv
}

/// `experiment_data.csv` -> `experiment_data_4821.csv`
pub fn unique_name<R: Rng>(file_name: &str, rng: &mut R) -> String {
    let suffix: u16 = rng.random_range(1000..=9999);
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{suffix}.{ext}"),
        None => format!("{file_name}_{suffix}"),
    }
}

/// Local file destination for the CSV
#[derive(Debug, Clone)]
pub struct Download {
    dir: PathBuf,
    file_name: String,
}

impl Download {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn unique(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        Self::new(dir, unique_name(file_name, &mut rand::rng()))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Writes the image-trial CSV.
    pub fn save(&self, records: &[TrialRecord]) -> Result<PathBuf, ExportError> {
        self.save_rendered(&render_csv(records))
    }

    /// Writes an already rendered CSV body.
    pub fn save_rendered(&self, csv: &str) -> Result<PathBuf, ExportError> {
        let path = self.path();
        write(&path, csv)?;
        info!(path = %path.display(), mime = MIME_TYPE, bytes = csv.len(), "data saved");
        Ok(path)
    }
}

fn write(path: &Path, contents: &str) -> Result<(), ExportError> {
    std::fs::write(path, contents).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use triplet_core::{Item, Response, ResponseRecord, StandardPhase};

    fn image_trial(paths: &[&str], response: Option<Response>, rt: u64) -> TrialRecord {
        TrialRecord::new(ResponseRecord {
            trial_index: 2,
            trial_type: TrialType::ImageButtonResponse,
            phase: StandardPhase::Trials,
            response,
            rt,
            items: Some(paths.iter().map(|p| Item::parse(*p)).collect()),
            correct: None,
        })
    }

    fn keyboard(rt: u64) -> TrialRecord {
        TrialRecord::new(ResponseRecord {
            trial_index: 0,
            trial_type: TrialType::HtmlKeyboardResponse,
            phase: StandardPhase::Instructions,
            response: Some(Response::Key(" ".into())),
            rt,
            items: None,
            correct: None,
        })
    }

    #[test]
    fn projects_chosen_image_into_response_column() {
        let records = vec![
            keyboard(3000),
            image_trial(
                &["img/img1.png", "img/img2.png", "img/img3.png"],
                Some(Response::Button(1)),
                842,
            ),
            keyboard(400),
        ];
        assert_eq!(
            render_csv(&records),
            "item1,item2,item3,response,rt\n\
             img/img1.png,img/img2.png,img/img3.png,img/img2.png,842\n"
        );
    }

    #[test]
    fn no_image_trials_gives_header_only() {
        assert_eq!(render_csv(&[keyboard(10)]), "item1,item2,item3,response,rt\n");
    }

    #[test]
    fn unresolvable_response_is_blank() {
        let record = image_trial(&["a.png", "b.png", "c.png"], Some(Response::Button(5)), 90);
        assert_eq!(CsvRow::from_record(&record).to_line(), "a.png,b.png,c.png,,90");
    }

    #[test]
    fn commas_in_items_are_not_escaped() {
        let record = image_trial(&["a,b.png", "c.png", "d.png"], Some(Response::Button(0)), 1);
        assert_eq!(CsvRow::from_record(&record).to_line(), "a,b.png,c.png,d.png,a,b.png,1");
    }

    #[test]
    fn unique_name_keeps_extension() {
        let mut rng = StdRng::seed_from_u64(7);
        let name = unique_name("experiment_data.csv", &mut rng);
        let digits = name
            .strip_prefix("experiment_data_")
            .and_then(|rest| rest.strip_suffix(".csv"))
            .unwrap();
        assert_eq!(digits.len(), 4);
        assert!(digits.parse::<u16>().unwrap() >= 1000);
    }
}
