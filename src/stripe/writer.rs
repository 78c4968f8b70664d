//! Scattered shard writes to per-destination output files
//!
//! One output file per physical destination index, named
//! `<originalName>.<physicalIndex>`. Every destination is opened once with
//! create+truncate (a rerun must never append to stale shards), receives
//! exactly one shard per stripe in strictly increasing stripe order, and is
//! flushed when the run finishes.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

use super::placement::PlacementPermutation;

/// Appends each stripe's shards to the destination files chosen by its
/// placement permutation
pub struct ShardWriter {
    destinations: Vec<BufWriter<File>>,
    paths: Vec<PathBuf>,
    stripes_written: u64,
}

impl ShardWriter {
    /// Open `total_shards` destination files for the given input
    ///
    /// Files are created in `output_dir` when set, otherwise next to the
    /// input. Existing files are truncated.
    pub fn create(
        input_path: &Path,
        output_dir: Option<&Path>,
        total_shards: usize,
    ) -> Result<Self> {
        let file_name = input_path
            .file_name()
            .ok_or_else(|| Error::InvalidInputPath(input_path.to_path_buf()))?
            .to_string_lossy()
            .into_owned();

        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => input_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
        };
        std::fs::create_dir_all(&dir)?;

        let mut destinations = Vec::with_capacity(total_shards);
        let mut paths = Vec::with_capacity(total_shards);

        for physical in 0..total_shards {
            let path = dir.join(format!("{}.{}", file_name, physical));
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&path)?;
            debug!("Opened destination {:?}", path);
            destinations.push(BufWriter::new(file));
            paths.push(path);
        }

        Ok(ShardWriter {
            destinations,
            paths,
            stripes_written: 0,
        })
    }

    /// Write one stripe's shards to their permuted destinations
    ///
    /// Logical shard `i` goes to the destination file at index
    /// `permutation.destination_of(i)`. Any single write failure is fatal
    /// for the whole run.
    pub fn write_stripe(
        &mut self,
        shards: &[Vec<u8>],
        permutation: &PlacementPermutation,
    ) -> Result<()> {
        if shards.len() != self.destinations.len() || permutation.len() != self.destinations.len() {
            return Err(Error::InvalidPlacement(format!(
                "stripe has {} shards and a {}-slot permutation, writer has {} destinations",
                shards.len(),
                permutation.len(),
                self.destinations.len()
            )));
        }

        for (logical, shard) in shards.iter().enumerate() {
            let physical = permutation.destination_of(logical);
            self.destinations[physical].write_all(shard)?;
        }

        self.stripes_written += 1;
        Ok(())
    }

    /// Flush all destinations; call after the final stripe
    pub fn finish(&mut self) -> Result<()> {
        for dest in &mut self.destinations {
            dest.flush()?;
        }
        debug!("Flushed {} destinations", self.destinations.len());
        Ok(())
    }

    /// Paths of the destination files, indexed by physical index
    pub fn destination_paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Stripes written so far
    pub fn stripes_written(&self) -> u64 {
        self.stripes_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stripe::placement::PlacementShuffler;

    fn shard_set(total: usize, block_size: usize, tag: u8) -> Vec<Vec<u8>> {
        (0..total)
            .map(|i| vec![tag.wrapping_add(i as u8); block_size])
            .collect()
    }

    #[test]
    fn test_destination_naming_and_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("archive.bin");
        std::fs::write(&input, b"x").unwrap();

        // Pre-seed a stale destination that must get truncated
        std::fs::write(dir.path().join("archive.bin.0"), vec![9u8; 128]).unwrap();

        let mut writer = ShardWriter::create(&input, None, 3).unwrap();
        let paths: Vec<_> = writer.destination_paths().to_vec();
        assert_eq!(paths[0], dir.path().join("archive.bin.0"));
        assert_eq!(paths[2], dir.path().join("archive.bin.2"));

        writer
            .write_stripe(&shard_set(3, 16, 1), &PlacementPermutation::identity(3))
            .unwrap();
        writer.finish().unwrap();

        // The stale 128 bytes are gone
        assert_eq!(std::fs::metadata(&paths[0]).unwrap().len(), 16);
    }

    #[test]
    fn test_shards_land_at_permuted_destinations() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data");
        std::fs::write(&input, b"x").unwrap();

        let perm = PlacementPermutation::from_mapping(vec![2, 0, 1]).unwrap();
        let shards = shard_set(3, 8, 10); // shard bytes: 10, 11, 12

        let mut writer = ShardWriter::create(&input, None, 3).unwrap();
        writer.write_stripe(&shards, &perm).unwrap();
        writer.finish().unwrap();

        let paths = writer.destination_paths().to_vec();
        // logical 0 -> physical 2, logical 1 -> physical 0, logical 2 -> physical 1
        assert_eq!(std::fs::read(&paths[2]).unwrap(), vec![10u8; 8]);
        assert_eq!(std::fs::read(&paths[0]).unwrap(), vec![11u8; 8]);
        assert_eq!(std::fs::read(&paths[1]).unwrap(), vec![12u8; 8]);
    }

    #[test]
    fn test_per_destination_stripe_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data");
        std::fs::write(&input, b"x").unwrap();

        let mut shuffler = PlacementShuffler::with_seed(3);
        let mut writer = ShardWriter::create(&input, None, 4).unwrap();

        // Three stripes with distinct tags; each destination must hold its
        // three shards in stripe order regardless of placement.
        let mut perms = Vec::new();
        for stripe in 0..3u8 {
            let perm = shuffler.permute(4);
            writer
                .write_stripe(&shard_set(4, 8, stripe * 100), &perm)
                .unwrap();
            perms.push(perm);
        }
        writer.finish().unwrap();

        for (physical, path) in writer.destination_paths().iter().enumerate() {
            let bytes = std::fs::read(path).unwrap();
            assert_eq!(bytes.len(), 24);
            for (stripe, perm) in perms.iter().enumerate() {
                let logical = perm.invert().destination_of(physical);
                let expected = (stripe as u8 * 100).wrapping_add(logical as u8);
                let segment = &bytes[stripe * 8..(stripe + 1) * 8];
                assert!(segment.iter().all(|&b| b == expected));
            }
        }
    }

    #[test]
    fn test_output_dir_override() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("shards");
        let input = dir.path().join("data");
        std::fs::write(&input, b"x").unwrap();

        let writer = ShardWriter::create(&input, Some(&out), 2).unwrap();
        assert!(writer.destination_paths()[0].starts_with(&out));
        assert!(out.is_dir());
    }

    #[test]
    fn test_input_without_file_name_rejected() {
        match ShardWriter::create(Path::new("/"), None, 3) {
            Err(Error::InvalidInputPath(path)) => assert_eq!(path, Path::new("/")),
            other => panic!("expected InvalidInputPath, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_shard_count_mismatch_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data");
        std::fs::write(&input, b"x").unwrap();

        let mut writer = ShardWriter::create(&input, None, 3).unwrap();
        let result = writer.write_stripe(&shard_set(2, 8, 0), &PlacementPermutation::identity(2));
        assert!(result.is_err());
    }
}
