//! Delete command implementation.

use super::open;
use crate::Format;
use campus_core::{DeleteImpact, EntityKind, Reference};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ReferenceOutput {
    kind: String,
    id: String,
    field: String,
}

impl From<&Reference> for ReferenceOutput {
    fn from(r: &Reference) -> Self {
        Self {
            kind: r.kind.to_string(),
            id: r.id.clone(),
            field: r.field.to_string(),
        }
    }
}

/// Delete command result.
#[derive(Serialize)]
struct DeleteOutput {
    kind: String,
    id: String,
    name: String,
    applied: bool,
    purged: Vec<ReferenceOutput>,
    retained: Vec<ReferenceOutput>,
}

impl DeleteOutput {
    fn new(impact: &DeleteImpact, applied: bool) -> Self {
        Self {
            kind: impact.kind.to_string(),
            id: impact.id.clone(),
            name: impact.name.clone(),
            applied,
            purged: impact.purged.iter().map(Into::into).collect(),
            retained: impact.retained.iter().map(Into::into).collect(),
        }
    }
}

/// Deletes a record, or only reports what the delete would remove.
pub fn run(
    path: &Path,
    kind: EntityKind,
    id: &str,
    preview: bool,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = open(path)?;
    let impact = if preview {
        db.preview_delete(kind, id)?
    } else {
        let impact = db.delete(kind, id)?;
        db.flush()?;
        impact
    };
    let output = DeleteOutput::new(&impact, !preview);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        Format::Text => {
            let verb = if preview { "Would delete" } else { "Deleted" };
            println!("{verb} {} {} ({})", output.kind, output.id, output.name);
            for r in &output.purged {
                println!("  remove from {} {} {}", r.kind, r.id, r.field);
            }
            for r in &output.retained {
                println!("  left in place: {} {} {}", r.kind, r.id, r.field);
            }
        }
    }
    Ok(())
}
