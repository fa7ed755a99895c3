use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use hulkgen_core::CellCoord;
use hulkgen_world::{query, Grid};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "hulk";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "hulk:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Portable description of a finished layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GridLayoutSnapshot {
    /// Number of columns in the grid.
    pub(crate) columns: u32,
    /// Number of rows in the grid.
    pub(crate) rows: u32,
    /// Filled cells in row-major order.
    pub(crate) filled: Vec<CellCoord>,
}

impl GridLayoutSnapshot {
    /// Captures the filled cells of the provided grid.
    #[must_use]
    pub(crate) fn from_grid(grid: &Grid) -> Self {
        let (columns, rows) = grid.dimensions();
        Self {
            columns,
            rows,
            filled: query::filled_cells(grid),
        }
    }

    /// Rebuilds the occupancy grid described by the snapshot.
    pub(crate) fn into_grid(self) -> Result<Grid, LayoutTransferError> {
        Grid::from_filled_cells(self.columns, self.rows, self.filled)
            .map_err(LayoutTransferError::InvalidGrid)
    }

    /// Encodes the snapshot into a single-line layout string.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let pairs: Vec<[u32; 2]> = self
            .filled
            .iter()
            .map(|cell| [cell.column(), cell.row()])
            .collect();
        let json = serde_json::to_vec(&pairs).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.columns, self.rows
        ))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let pairs: Vec<[u32; 2]> =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        let mut filled = Vec::with_capacity(pairs.len());
        for [column, row] in pairs {
            if column >= columns || row >= rows {
                return Err(LayoutTransferError::CellOutOfBounds { column, row });
            }
            filled.push(CellCoord::new(column, row));
        }
        filled.sort_by_key(|cell| (cell.row(), cell.column()));
        filled.dedup();

        Ok(Self {
            columns,
            rows,
            filled,
        })
    }
}

/// Errors that can occur while encoding or decoding layout strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload was not a JSON list of `[column, row]` pairs.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// A listed cell lies outside the declared dimensions.
    #[error("cell ({column}, {row}) lies outside the declared grid")]
    CellOutOfBounds {
        /// Column of the offending cell.
        column: u32,
        /// Row of the offending cell.
        row: u32,
    },
    /// The decoded layout could not be turned into a grid.
    #[error("could not rebuild grid: {0}")]
    InvalidGrid(#[source] hulkgen_world::GridError),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(LayoutTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}
