use chrono::{DateTime, Utc};
use mosaic_client::{DocumentUpload, UploadResponse};
use serde::{Deserialize, Serialize};

/// A file the backend accepted into the retrieval corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub name: String,
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub method: String,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    /// Records added to the document list
    pub committed: Vec<DocumentRecord>,
    pub warnings: Vec<String>,
}

/// Records for the submitted files the server reports as stored
pub(crate) fn accepted_records(
    submitted: &[DocumentUpload],
    response: &UploadResponse,
) -> Vec<DocumentRecord> {
    let method = response.method.clone().unwrap_or_else(|| "unknown".to_string());
    let uploaded_at = Utc::now();

    submitted
        .iter()
        .filter(|file| response.files.iter().any(|name| name == &file.name))
        .map(|file| DocumentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: file.name.clone(),
            size: file.size(),
            mime: file.mime.clone(),
            uploaded_at,
            method: method.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(files: &[&str], method: Option<&str>) -> UploadResponse {
        UploadResponse {
            status: "ok".to_string(),
            message: None,
            files: files.iter().map(|f| f.to_string()).collect(),
            warnings: Vec::new(),
            method: method.map(str::to_string),
        }
    }

    #[test]
    fn test_only_accepted_files_are_recorded() {
        let submitted = vec![
            DocumentUpload::new("a.pdf", vec![0; 10]),
            DocumentUpload::new("b.exe", vec![0; 3]),
        ];

        let records = accepted_records(&submitted, &response(&["a.pdf"], Some("vector_store")));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "a.pdf");
        assert_eq!(records[0].size, 10);
        assert_eq!(records[0].method, "vector_store");
    }

    #[test]
    fn test_method_defaults_to_unknown() {
        let submitted = vec![DocumentUpload::new("a.pdf", Vec::new())];
        let records = accepted_records(&submitted, &response(&["a.pdf"], None));
        assert_eq!(records[0].method, "unknown");
    }
}
