// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

use anyhow::{anyhow, Result};

use super::schema::FIELDS;
use super::types::{Record, Row};

/// Fold rows left to right with each field's combinator.
///
/// The first row seeds the accumulator, so a single row comes back
/// unchanged. An empty input is an error: the job was not found.
pub fn reconcile<I>(rows: I) -> Result<Record>
where
    I: IntoIterator<Item = Row>,
{
    let mut rows = rows.into_iter();
    let first = rows.next().ok_or_else(|| anyhow!("No rows to reconcile"))?;

    let values = rows.fold(first, |acc, row| {
        acc.into_iter()
            .zip(row)
            .zip(FIELDS.iter())
            .map(|((a, b), field)| (field.combine)(a, b))
            .collect()
    });

    Ok(Record::new(values))
}
