//! [`Command`] for replacing the [`YearRangeValue`]s of a [`CalculatorKind`].

use std::collections::HashSet;

use common::operations::{
    By, Commit, Delete, Insert, Lock, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        CalculatorKind, ValidationError, ValidationErrors, YearRangeValue,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for replacing all the [`YearRangeValue`]s of a
/// [`CalculatorKind`], or the global ones.
///
/// Replacing with the same rows twice leaves the same rows stored.
#[derive(Clone, Debug)]
pub struct ReplaceYearRangeValues {
    /// [`CalculatorKind`] to replace the rows of, or [`None`] for the global
    /// rows.
    pub kind: Option<CalculatorKind>,

    /// New rows, each of the same [`CalculatorKind`].
    pub rows: Vec<YearRangeValue>,
}

impl<Db> Command<ReplaceYearRangeValues> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Vec<YearRangeValue>, Option<CalculatorKind>>>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Vec<YearRangeValue>, Option<CalculatorKind>>>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<Vec<YearRangeValue>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vec<YearRangeValue>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReplaceYearRangeValues,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReplaceYearRangeValues { kind, rows } = cmd;

        validate(kind, &rows).map_err(tracerr::from_and_wrap!(=> E))?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent replacements interleaving their rows.
        tx.execute(Lock(By::<Vec<YearRangeValue>, _>::new(kind)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Delete(By::<Vec<YearRangeValue>, _>::new(kind)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(rows.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(
            "{} `YearRangeValue`(s) stored for `{}`",
            rows.len(),
            kind.map_or("global", CalculatorKind::as_str),
        );

        Ok(rows)
    }
}

/// Checks the provided rows all belong to the provided [`CalculatorKind`] and
/// have unique identifiers.
fn validate(
    kind: Option<CalculatorKind>,
    rows: &[YearRangeValue],
) -> Result<(), ValidationErrors> {
    let mut errs = ValidationErrors::default();
    let mut seen = HashSet::new();
    for row in rows {
        if row.kind != kind {
            errs.push(ValidationError::new(
                "rows",
                format!(
                    "row `{}` is of `{}` kind",
                    row.identifier,
                    row.kind.map_or("global", CalculatorKind::as_str),
                ),
            ));
        }
        if !seen.insert(row.identifier.as_str()) {
            errs.push(ValidationError::new(
                "rows",
                format!("row `{}` is duplicated", row.identifier),
            ));
        }
    }
    errs.finish()
}

/// Error of [`ReplaceYearRangeValues`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Rows are malformed.
    #[display("Invalid input: {_0}")]
    Validation(ValidationErrors),
}
