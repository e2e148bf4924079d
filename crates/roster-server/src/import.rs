//! Bulk volunteer import from CSV.
//!
//! Expected header columns: `name, lessonNumber, age, gender, city, state,
//! country, kendra, contact, skills`, plus an optional `uid`. Missing columns
//! default to empty. A row whose `uid` is a UUID overwrites the volunteer
//! stored under that id, so re-importing the same file is idempotent; other
//! rows create new volunteers.

use std::io::Read;

use roster_core::{store::RosterStore, volunteer::NewVolunteer};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ImportRow {
  uid:           String,
  name:          String,
  lesson_number: String,
  age:           String,
  gender:        String,
  city:          String,
  state:         String,
  country:       String,
  kendra:        String,
  contact:       String,
  skills:        String,
}

impl ImportRow {
  fn into_volunteer(self) -> (Option<Uuid>, NewVolunteer) {
    let id = Uuid::parse_str(self.uid.trim()).ok();
    let volunteer = NewVolunteer {
      name:          self.name.trim().to_owned(),
      city:          self.city,
      state:         self.state,
      country:       self.country,
      kendra:        self.kendra,
      lesson_number: self.lesson_number,
      age:           self.age.trim().parse().ok(),
      gender:        self.gender,
      contact:       self.contact,
      skills:        self.skills,
    };
    (id, volunteer)
  }
}

/// Counts reported once an import finishes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
  pub created:  usize,
  pub upserted: usize,
  pub failed:   usize,
}

/// Import every row of `input` into `store`.
///
/// Rows are handled independently: a row that fails to parse, lacks a name,
/// or is rejected by the store is logged and skipped. Only a broken header
/// aborts the import.
pub async fn import_volunteers<S: RosterStore>(
  store: &S,
  input: impl Read,
) -> csv::Result<ImportSummary> {
  let mut reader = csv::ReaderBuilder::new()
    .trim(csv::Trim::Headers)
    .flexible(true)
    .from_reader(input);
  reader.headers()?;
  let rows: Vec<csv::Result<ImportRow>> = reader.deserialize().collect();

  let mut summary = ImportSummary::default();
  for (index, row) in rows.into_iter().enumerate() {
    // Header is line 1.
    let line = index + 2;
    let row = match row {
      Ok(row) => row,
      Err(e) => {
        warn!(line, error = %e, "skipping unreadable row");
        summary.failed += 1;
        continue;
      }
    };

    let (id, volunteer) = row.into_volunteer();
    if let Err(e) = volunteer.validate() {
      warn!(line, error = %e, "skipping row");
      summary.failed += 1;
      continue;
    }

    let saved = match id {
      Some(id) => store.put_volunteer(id, volunteer).await.map(|_| true),
      None => store.add_volunteer(volunteer).await.map(|_| false),
    };
    match saved {
      Ok(true) => summary.upserted += 1,
      Ok(false) => summary.created += 1,
      Err(e) => {
        warn!(line, error = %e, "failed to save volunteer");
        summary.failed += 1;
      }
    }
  }

  info!(
    created = summary.created,
    upserted = summary.upserted,
    failed = summary.failed,
    "volunteer import finished"
  );
  Ok(summary)
}
