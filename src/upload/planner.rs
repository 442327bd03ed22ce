//! Chunk planning
//!
//! Maps a file size to the chunk geometry declared at session initiation.
//! The API requires both `chunk_size` and `total_chunk_count` up front and
//! defines the count as `floor(size / chunk_size)` with the remainder folded
//! into the last transmitted chunk; the plan must match that exactly or the
//! server rejects or truncates the session.

use crate::{Error, Result};

/// Minimum chunk size accepted by the API (5 MiB)
pub const MIN_CHUNK_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum nominal chunk size accepted by the API (64 MiB)
pub const MAX_CHUNK_SIZE: u64 = 64 * 1024 * 1024;

/// Default chunk size used for multi-chunk uploads (10 MiB)
pub const DEFAULT_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum number of chunk requests per session
pub const MAX_CHUNK_COUNT: u64 = 1000;

/// Hard ceiling on any single transmitted chunk, remainder included (128 MiB)
pub const FINAL_CHUNK_CEILING: u64 = 128 * 1024 * 1024;

/// Immutable chunk geometry for one upload attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPlan {
    /// Total file size in bytes
    pub total_size: u64,
    /// Nominal chunk size in bytes
    pub chunk_size: u64,
    /// Exact number of chunk requests
    pub chunk_count: u64,
}

impl UploadPlan {
    /// Compute the chunk geometry for a file of `total_size` bytes.
    ///
    /// Files up to [`MAX_CHUNK_SIZE`] go up as a single chunk equal to the
    /// file size. Larger files use [`DEFAULT_CHUNK_SIZE`] with
    /// `floor(total_size / chunk_size)` chunks and the remainder absorbed by
    /// the final chunk; if that would exceed [`MAX_CHUNK_COUNT`] chunks, the
    /// chunk size is raised (within [`MIN_CHUNK_SIZE`]..[`MAX_CHUNK_SIZE`])
    /// to bring the count back down.
    pub fn for_size(total_size: u64) -> Result<Self> {
        if total_size == 0 {
            return Err(Error::invalid_input("video size must be positive"));
        }

        if total_size <= MAX_CHUNK_SIZE {
            return Ok(Self {
                total_size,
                chunk_size: total_size,
                chunk_count: 1,
            });
        }

        let mut chunk_size = DEFAULT_CHUNK_SIZE;
        let mut chunk_count = total_size / chunk_size;

        if chunk_count > MAX_CHUNK_COUNT {
            chunk_size = total_size
                .div_ceil(MAX_CHUNK_COUNT)
                .clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE);
            chunk_count = total_size / chunk_size;
        }

        if chunk_count > MAX_CHUNK_COUNT {
            return Err(Error::invalid_input(format!(
                "file of {} bytes cannot be uploaded in {} chunks of at most {} bytes",
                total_size, MAX_CHUNK_COUNT, MAX_CHUNK_SIZE
            )));
        }

        let plan = Self {
            total_size,
            chunk_size,
            chunk_count,
        };
        // Remainder < chunk_size <= 64 MiB, so the final chunk stays under the ceiling
        debug_assert!(plan.chunk_len(plan.chunk_count - 1) < FINAL_CHUNK_CEILING);

        Ok(plan)
    }

    /// Inclusive byte range of chunk `index`.
    ///
    /// The final chunk always ends at `total_size - 1`, absorbing any
    /// remainder beyond the nominal chunk size.
    ///
    /// # Panics
    ///
    /// Panics if `index >= chunk_count`.
    pub fn chunk_range(&self, index: u64) -> (u64, u64) {
        assert!(index < self.chunk_count, "chunk index out of range");
        let start = index * self.chunk_size;
        let end = if index == self.chunk_count - 1 {
            self.total_size - 1
        } else {
            start + self.chunk_size - 1
        };
        (start, end)
    }

    /// Length in bytes of chunk `index`
    pub fn chunk_len(&self, index: u64) -> u64 {
        let (start, end) = self.chunk_range(index);
        end - start + 1
    }
}
