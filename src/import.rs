use std::{path::Path, sync::Arc};

use csv_async::{AsyncReader, ErrorKind};
use futures::stream::StreamExt;
use tokio::{fs::File, sync::mpsc::channel};

use crate::{
    binding::BoundForm,
    error::Result,
    models::Person,
    service::{BATCH_SIZE, PersonService},
    view_models::{PersonForm, PersonViewModel},
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: u64,
    /// File line on which each skipped row starts.
    pub skipped_lines: Vec<u64>,
}

impl ImportSummary {
    pub fn skipped(&self) -> usize {
        self.skipped_lines.len()
    }
}

/// Streams collectors from a CSV file into the registry.
///
/// Rows go through the same binding and validation as the web form; rows that
/// fail either are logged and skipped. Valid rows are handed to a writer task
/// in batches.
pub async fn import_csv(service: Arc<dyn PersonService>, path: &Path) -> Result<ImportSummary> {
    tracing::info!("Importing collectors from {}", path.display());

    let start = std::time::Instant::now();

    let (to_db, mut from_reader) = channel::<Vec<Person>>(4);

    let writer_handle = tokio::spawn(async move {
        let mut imported = 0;
        while let Some(people) = from_reader.recv().await {
            imported += service.insert_many(people).await?;
        }
        Result::Ok(imported)
    });

    let file = File::open(path).await?;
    let mut reader = AsyncReader::from_reader(file);
    let headers = reader.headers().await?.clone();

    let mut skipped_lines = Vec::new();
    let mut batch = Vec::with_capacity(BATCH_SIZE);
    let mut records = std::pin::pin!(reader.records());

    while let Some(record) = records.next().await {
        let record = match record {
            Ok(record) => record,
            Err(e) if matches!(e.kind(), ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                tracing::warn!(line, "Skipping unreadable row: {e}");
                skipped_lines.push(line);
                continue;
            }
        };
        // Quoted fields may span lines, so ask the reader where the row began
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let form: PersonForm = match record.deserialize(Some(&headers)) {
            Ok(form) => form,
            Err(e) => {
                tracing::warn!(line, "Skipping malformed row: {e}");
                skipped_lines.push(line);
                continue;
            }
        };

        let bound = BoundForm::<PersonViewModel>::from_form(form);
        if !bound.model_state.is_valid() {
            tracing::warn!(line, errors = ?bound.model_state.errors(), "Skipping invalid row");
            skipped_lines.push(line);
            continue;
        }

        batch.push(Person::from(bound.model));

        if batch.len() == BATCH_SIZE {
            let full = std::mem::replace(&mut batch, Vec::with_capacity(BATCH_SIZE));
            if to_db.send(full).await.is_err() {
                // The writer stopped early; its error surfaces below
                break;
            }
        }
    }

    if !batch.is_empty() {
        let _ = to_db.send(batch).await;
    }
    drop(to_db);

    let imported = writer_handle.await??;

    tracing::info!(
        "Imported {imported} collectors, skipped {}, in {:?}",
        skipped_lines.len(),
        start.elapsed()
    );

    Ok(ImportSummary {
        imported,
        skipped_lines,
    })
}
