//! Training corpus loading and saving.
//!
//! Supported inputs:
//! - JSON: `{"training_data": [{"text", "label"}, ..]}`, the same nested one
//!   level deeper, or a bare array of samples
//! - CSV with a header row
//! - Excel/ODS workbooks (first sheet, header row), behind the `excel` feature
//! - A folder of workbooks
//!
//! Rows whose text or label is empty after trimming are skipped. When a
//! [`LabelMapping`] is attached, label ids are replaced by names.

use super::mapping::LabelMapping;
use super::{Dataset, TrainingSample};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// File extensions read as workbooks.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "ods"];

/// Summary of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    /// Number of samples
    pub total_samples: usize,
    /// Number of distinct labels
    pub unique_labels: usize,
    /// Sample count per label, in first-seen order
    pub samples_per_label: IndexMap<String, usize>,
    /// Mean text length in characters
    pub avg_text_length: f64,
    /// Shortest text length in characters
    pub min_text_length: usize,
    /// Longest text length in characters
    pub max_text_length: usize,
}

#[derive(Serialize)]
struct DatasetMetadata {
    description: &'static str,
    total_samples: usize,
}

#[derive(Serialize)]
struct DatasetFile {
    metadata: DatasetMetadata,
    training_data: Vec<TrainingSample>,
}

/// Reads labeled clauses from files.
#[derive(Debug, Clone)]
pub struct DataLoader {
    text_column: String,
    label_column: String,
    mapping: Option<LabelMapping>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self {
            text_column: "text".to_string(),
            label_column: "label".to_string(),
            mapping: None,
        }
    }
}

impl DataLoader {
    /// Loader for `text`/`label` columns without label mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use other column names for CSV and workbook inputs.
    pub fn with_columns(mut self, text: impl Into<String>, label: impl Into<String>) -> Self {
        self.text_column = text.into();
        self.label_column = label.into();
        self
    }

    /// Map label ids to names while loading.
    pub fn with_mapping(mut self, mapping: LabelMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Attached label mapping.
    pub fn mapping(&self) -> Option<&LabelMapping> {
        self.mapping.as_ref()
    }

    /// Load a dataset, choosing the reader from the file extension.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let extension = extension_of(path);
        match extension.as_str() {
            "json" => self.load_json(path),
            "csv" => self.load_csv(path),
            ext if SPREADSHEET_EXTENSIONS.contains(&ext) => self.load_excel(path),
            other => Err(Error::UnsupportedFormat(format!(".{}", other))),
        }
    }

    /// Add a sample if both fields have content.
    fn accept(&self, dataset: &mut Dataset, text: &str, label: &str) {
        let text = text.trim();
        let label = label.trim();
        if text.is_empty() || label.is_empty() {
            return;
        }
        let label = match &self.mapping {
            Some(mapping) => mapping.map_label(label),
            None => label.to_string(),
        };
        dataset.push(text, label);
    }

    /// Load a JSON dataset.
    pub fn load_json(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let file = File::open(path.as_ref())?;
        let value: Value = serde_json::from_reader(std::io::BufReader::new(file))?;

        let mut items = value.get("training_data").unwrap_or(&value);
        if let Some(inner) = items.get("training_data") {
            items = inner;
        }

        let mut dataset = Dataset::new();
        for item in items.as_array().map(Vec::as_slice).unwrap_or_default() {
            let field = |name: &str| item.get(name).and_then(Value::as_str).unwrap_or("");
            self.accept(&mut dataset, field("text"), field("label"));
        }
        debug!("Loaded {} samples from {}", dataset.len(), path.as_ref().display());
        Ok(dataset)
    }

    /// Load a CSV dataset with a header row.
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

        let headers = reader.headers()?.clone();
        let text_idx = headers.iter().position(|h| h.trim() == self.text_column);
        let label_idx = headers.iter().position(|h| h.trim() == self.label_column);
        let (Some(text_idx), Some(label_idx)) = (text_idx, label_idx) else {
            warn!(
                "{} has no '{}'/'{}' columns",
                path.display(),
                self.text_column,
                self.label_column
            );
            return Ok(Dataset::new());
        };

        let mut dataset = Dataset::new();
        for record in reader.records() {
            let record = record?;
            self.accept(
                &mut dataset,
                record.get(text_idx).unwrap_or(""),
                record.get(label_idx).unwrap_or(""),
            );
        }
        debug!("Loaded {} samples from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Load the first sheet of a workbook.
    ///
    /// Cells reading `nan` are treated as empty.
    #[cfg(feature = "excel")]
    pub fn load_excel(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        use calamine::{open_workbook_auto, Reader};

        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| Error::Spreadsheet(format!("Failed to open {}: {}", path.display(), e)))?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let Some(first) = sheet_names.first() else {
            return Err(Error::Spreadsheet(format!("No sheets found in {}", path.display())));
        };
        let range = workbook
            .worksheet_range(first)
            .map_err(|e| Error::Spreadsheet(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(Dataset::new());
        };
        let header: Vec<String> = header.iter().map(cell_to_string).collect();
        let text_idx = header.iter().position(|h| h.trim() == self.text_column);
        let label_idx = header.iter().position(|h| h.trim() == self.label_column);
        let (Some(text_idx), Some(label_idx)) = (text_idx, label_idx) else {
            warn!(
                "{} has no '{}'/'{}' columns",
                path.display(),
                self.text_column,
                self.label_column
            );
            return Ok(Dataset::new());
        };

        let mut dataset = Dataset::new();
        for row in rows {
            let cell = |idx: usize| {
                let value = row.get(idx).map(cell_to_string).unwrap_or_default();
                if value.trim().eq_ignore_ascii_case("nan") {
                    String::new()
                } else {
                    value
                }
            };
            self.accept(&mut dataset, &cell(text_idx), &cell(label_idx));
        }
        Ok(dataset)
    }

    /// Workbook support is compiled out.
    #[cfg(not(feature = "excel"))]
    pub fn load_excel(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        Err(Error::UnsupportedFormat(format!(
            "{} (build with the `excel` feature to read workbooks)",
            path.as_ref().display()
        )))
    }

    /// Load every workbook in a folder, in file-name order.
    ///
    /// Office lock files (`~$*`) are skipped. A workbook that fails to load
    /// is logged and skipped.
    pub fn load_folder(&self, dir: impl AsRef<Path>) -> Result<Dataset> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::NotFound(dir.to_path_buf()));
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && SPREADSHEET_EXTENSIONS.contains(&extension_of(p).as_str()))
            .collect();
        files.sort();

        if files.is_empty() {
            warn!("No spreadsheet files found in {}", dir.display());
            return Err(Error::NotFound(dir.to_path_buf()));
        }

        let mut dataset = Dataset::new();
        for file in files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if name.starts_with("~$") {
                continue;
            }

            match self.load_excel(&file) {
                Ok(part) => {
                    info!("Loaded: {} ({} samples)", name, part.len());
                    dataset.append(part);
                },
                Err(e) => warn!("Error loading {}: {}", name, e),
            }
        }
        Ok(dataset)
    }

    /// Load a folder or a single file, mapping label ids through the
    /// optional mapping file.
    pub fn load_with_mapping(path: impl AsRef<Path>, mapping_file: Option<&Path>) -> Result<Dataset> {
        let mut loader = DataLoader::new();
        if let Some(mapping_file) = mapping_file {
            let mapping = LabelMapping::from_json_file(mapping_file)?;
            info!("Loaded {} label mappings from {}", mapping.len(), mapping_file.display());
            loader = loader.with_mapping(mapping);
        }

        let path = path.as_ref();
        if path.is_dir() {
            loader.load_folder(path)
        } else {
            loader.load(path)
        }
    }

    /// Write a dataset as pretty-printed JSON with a metadata header.
    pub fn save_json(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
        let file = DatasetFile {
            metadata: DatasetMetadata {
                description: "Lease clause training data",
                total_samples: dataset.len(),
            },
            training_data: dataset.samples(),
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &file)?;
        Ok(())
    }

    /// Write a dataset as CSV with a `text,label` header.
    pub fn save_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["text", "label"])?;
        for (text, label) in dataset.iter() {
            writer.write_record([text, label])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Summarize a dataset.
    pub fn dataset_stats(dataset: &Dataset) -> DatasetStats {
        let mut samples_per_label: IndexMap<String, usize> = IndexMap::new();
        for label in &dataset.labels {
            *samples_per_label.entry(label.clone()).or_insert(0) += 1;
        }

        let lengths: Vec<usize> = dataset.texts.iter().map(|t| t.chars().count()).collect();
        let avg_text_length = if lengths.is_empty() {
            0.0
        } else {
            lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
        };

        DatasetStats {
            total_samples: dataset.len(),
            unique_labels: samples_per_label.len(),
            samples_per_label,
            avg_text_length,
            min_text_length: lengths.iter().copied().min().unwrap_or(0),
            max_text_length: lengths.iter().copied().max().unwrap_or(0),
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(feature = "excel")]
fn cell_to_string(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        },
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{:?}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_json_variants() {
        let dir = tempdir().unwrap();
        let loader = DataLoader::new();

        let wrapped = dir.path().join("wrapped.json");
        std::fs::write(
            &wrapped,
            r#"{"training_data": [{"text": " Rent is due. ", "label": "rent"}, {"text": "", "label": "x"}]}"#,
        )
        .unwrap();
        let data = loader.load(&wrapped).unwrap();
        assert_eq!(data.texts, vec!["Rent is due."]);

        let nested = dir.path().join("nested.json");
        std::fs::write(
            &nested,
            r#"{"training_data": {"training_data": [{"text": "No pets.", "label": "pets"}]}}"#,
        )
        .unwrap();
        assert_eq!(loader.load(&nested).unwrap().labels, vec!["pets"]);

        let bare = dir.path().join("bare.json");
        std::fs::write(&bare, r#"[{"text": "No pets.", "label": "pets"}]"#).unwrap();
        assert_eq!(loader.load(&bare).unwrap().len(), 1);
    }

    #[test]
    fn test_csv_custom_columns_and_mapping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "clause,type\n\"Rent, monthly\",id1\nNo pets,id2\n ,id3\n").unwrap();

        let mut mapping = LabelMapping::default();
        mapping.insert("id1", "rent_payment");
        let loader = DataLoader::new().with_columns("clause", "type").with_mapping(mapping);
        let data = loader.load(&path).unwrap();

        assert_eq!(data.texts, vec!["Rent, monthly", "No pets"]);
        assert_eq!(data.labels, vec!["rent_payment", "id2"]);
    }

    #[test]
    fn test_unsupported_and_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "x").unwrap();
        assert!(matches!(DataLoader::new().load(&path), Err(Error::UnsupportedFormat(_))));
        assert!(matches!(
            DataLoader::new().load(dir.path().join("absent.json")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_stats() {
        let mut data = Dataset::new();
        data.push("abcd", "b");
        data.push("ab", "a");
        data.push("abcdef", "b");
        let stats = DataLoader::dataset_stats(&data);

        assert_eq!(stats.total_samples, 3);
        assert_eq!(stats.unique_labels, 2);
        assert_eq!(stats.samples_per_label.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(stats.avg_text_length, 4.0);
        assert_eq!((stats.min_text_length, stats.max_text_length), (2, 6));
        assert_eq!(DataLoader::dataset_stats(&Dataset::new()).avg_text_length, 0.0);
    }
}
