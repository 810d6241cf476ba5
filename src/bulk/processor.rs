//! Archive-driven batch validation
//!
//! ```text
//! open archive -> allocate scratch -> unpack + pair entries
//!              -> validate each pair -> reports (archive order) -> drop scratch
//! ```
//!
//! A pair-level problem becomes a failed report; only an unreadable archive
//! aborts the batch. Tar and zip archives are told apart by their leading
//! bytes.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use std::thread;

use serde::Serialize;
use tar::Archive;
use zip::result::ZipError;
use zip::ZipArchive;

use super::errors::{ArchiveError, BulkResult, PairError};
use super::pairing::{
    normalize_entry_path, EntryClass, EntryKind, PairingConvention, SuffixConvention,
};
use super::scratch::ScratchDir;
use crate::dispatch::{DispatchError, Variant};
use crate::observability::{Event, ObservationScope};
use crate::validation::ValidationResult;

/// Outcome of one pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PairOutcome {
    /// Both files were read and checked; findings may be empty
    #[serde(rename = "errors")]
    Validated(ValidationResult),
    /// The pair could not be checked
    #[serde(rename = "failure")]
    Failed(PairError),
}

/// One entry of the batch output
///
/// Wire shape: `{pairId, variant, errors}` or `{pairId, variant, failure}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairReport {
    pub pair_id: String,
    pub variant: Option<Variant>,
    #[serde(flatten)]
    pub outcome: PairOutcome,
}

impl PairReport {
    /// Findings, if the pair was validated
    pub fn errors(&self) -> Option<&ValidationResult> {
        match &self.outcome {
            PairOutcome::Validated(errors) => Some(errors),
            PairOutcome::Failed(_) => None,
        }
    }

    /// Failure, if the pair could not be validated
    pub fn failure(&self) -> Option<&PairError> {
        match &self.outcome {
            PairOutcome::Validated(_) => None,
            PairOutcome::Failed(err) => Some(err),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure().is_some()
    }
}

/// An entry unpacked into scratch
#[derive(Debug)]
struct Extracted {
    entry: String,
    path: PathBuf,
}

/// A pair as collected from the archive, before validation
#[derive(Debug)]
struct PendingPair {
    pair_id: String,
    variant: Option<String>,
    grammar: Option<Extracted>,
    data: Option<Extracted>,
    failure: Option<PairError>,
}

impl PendingPair {
    fn new(pair_id: &str, variant: Option<&str>) -> Self {
        Self {
            pair_id: pair_id.to_string(),
            variant: variant.map(str::to_string),
            grammar: None,
            data: None,
            failure: None,
        }
    }

    /// First failure wins
    fn fail(&mut self, err: PairError) {
        if self.failure.is_none() {
            self.failure = Some(err);
        }
    }

    fn into_report(self) -> PairReport {
        let parsed = self.variant.as_deref().map(str::parse::<Variant>).transpose();
        let variant = parsed.as_ref().ok().copied().flatten();

        let outcome = match self.load(parsed) {
            Ok((variant, grammar, data)) => {
                let errors = variant.check_data(&grammar, &data);
                let findings = errors.len().to_string();
                Event::BulkPairValidated.emit(&[
                    ("pair", self.pair_id.as_str()),
                    ("findings", findings.as_str()),
                ]);
                PairOutcome::Validated(errors)
            }
            Err(err) => {
                let message = err.to_string();
                Event::BulkPairFailed.emit(&[
                    ("pair", self.pair_id.as_str()),
                    ("code", err.code()),
                    ("error", message.as_str()),
                ]);
                PairOutcome::Failed(err)
            }
        };

        PairReport {
            pair_id: self.pair_id,
            variant,
            outcome,
        }
    }

    fn load(
        &self,
        parsed: Result<Option<Variant>, DispatchError>,
    ) -> Result<(Variant, String, String), PairError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let variant = parsed?.ok_or_else(|| PairError::NamingMismatch {
            entry: self.pair_id.clone(),
            expected: "a variant directory".to_string(),
        })?;
        let grammar = self
            .grammar
            .as_ref()
            .ok_or_else(|| PairError::MissingGrammar(self.pair_id.clone()))?;
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| PairError::MissingData(self.pair_id.clone()))?;

        Ok((variant, read_extracted(grammar)?, read_extracted(data)?))
    }
}

fn read_extracted(extracted: &Extracted) -> Result<String, PairError> {
    fs::read_to_string(&extracted.path).map_err(|e| PairError::unreadable(&extracted.entry, e))
}

/// Container format, sniffed from the leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveFormat {
    Tar,
    Zip,
}

const ZIP_LOCAL_HEADER: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_ARCHIVE: &[u8] = b"PK\x05\x06";

impl ArchiveFormat {
    /// Leaves the reader rewound
    fn detect<R: Read + Seek>(reader: &mut R) -> io::Result<Self> {
        let mut magic = Vec::with_capacity(4);
        reader.by_ref().take(4).read_to_end(&mut magic)?;
        reader.rewind()?;

        if magic == ZIP_LOCAL_HEADER || magic == ZIP_EMPTY_ARCHIVE {
            Ok(ArchiveFormat::Zip)
        } else {
            Ok(ArchiveFormat::Tar)
        }
    }
}

/// What an archive member is on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryShape {
    Regular,
    /// Symlink, hard link, device or fifo
    Special,
}

const S_IFMT: u32 = 0o170000;
const S_IFREG: u32 = 0o100000;

/// Pairs keyed by id, kept in first-appearance order
#[derive(Debug, Default)]
struct PairTable {
    pairs: Vec<PendingPair>,
    index: HashMap<String, usize>,
}

impl PairTable {
    fn slot(&mut self, pair_id: &str, variant: Option<&str>) -> &mut PendingPair {
        let position = match self.index.get(pair_id).copied() {
            Some(position) => position,
            None => {
                self.pairs.push(PendingPair::new(pair_id, variant));
                self.index.insert(pair_id.to_string(), self.pairs.len() - 1);
                self.pairs.len() - 1
            }
        };
        &mut self.pairs[position]
    }

    fn contains(&self, pair_id: &str, kind: EntryKind) -> bool {
        self.index
            .get(pair_id)
            .map(|&position| {
                let pair = &self.pairs[position];
                match kind {
                    EntryKind::Grammar => pair.grammar.is_some(),
                    EntryKind::Data => pair.data.is_some(),
                }
            })
            .unwrap_or(false)
    }

    fn add(&mut self, pair_id: &str, variant: &str, kind: EntryKind, extracted: Extracted) {
        let pair = self.slot(pair_id, Some(variant));
        match kind {
            EntryKind::Grammar => pair.grammar = Some(extracted),
            EntryKind::Data => pair.data = Some(extracted),
        }
    }

    fn fail(&mut self, pair_id: &str, variant: Option<&str>, err: PairError) {
        self.slot(pair_id, variant).fail(err);
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }

    fn into_pairs(self) -> Vec<PendingPair> {
        self.pairs
    }
}

/// Validates every grammar/data pair in a tar or zip archive
pub struct BulkProcessor {
    convention: Box<dyn PairingConvention>,
    scratch_root: PathBuf,
    workers: usize,
}

impl BulkProcessor {
    /// Processor with the default suffix convention and a single worker
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            convention: Box::new(SuffixConvention::default()),
            scratch_root: scratch_root.into(),
            workers: 1,
        }
    }

    pub fn with_convention(mut self, convention: impl PairingConvention + 'static) -> Self {
        self.convention = Box::new(convention);
        self
    }

    /// Number of pairs validated concurrently; clamped to at least one
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    /// Validates every pair in the archive.
    ///
    /// Reports follow the order in which pairs first appear in the archive.
    /// The scratch directory is removed before this returns, whatever the
    /// outcome.
    pub fn process_archive(&self, archive_path: &Path) -> BulkResult<Vec<PairReport>> {
        let archive = archive_path.display().to_string();

        match self.process(archive_path) {
            Ok(reports) => {
                let total = reports.len().to_string();
                let failed = reports.iter().filter(|r| r.is_failed()).count().to_string();
                Event::BulkComplete.emit(&[
                    ("archive", archive.as_str()),
                    ("pairs", total.as_str()),
                    ("failed", failed.as_str()),
                ]);
                Ok(reports)
            }
            Err(err) => {
                let message = err.to_string();
                Event::BulkAborted.emit(&[
                    ("archive", archive.as_str()),
                    ("code", err.code()),
                    ("error", message.as_str()),
                ]);
                Err(err)
            }
        }
    }

    fn process(&self, archive_path: &Path) -> BulkResult<Vec<PairReport>> {
        let file = File::open(archive_path).map_err(|source| ArchiveError::Open {
            path: archive_path.to_path_buf(),
            source,
        })?;

        let scratch = ScratchDir::create(&self.scratch_root)?;
        let archive = archive_path.display().to_string();
        let scratch_path = scratch.path().display().to_string();
        Event::BulkStart.emit(&[
            ("archive", archive.as_str()),
            ("scratch", scratch_path.as_str()),
        ]);

        let pairs = self.unpack(file, archive_path, &scratch)?;
        Ok(self.run_pairs(pairs))
    }

    fn unpack(
        &self,
        file: File,
        archive_path: &Path,
        scratch: &ScratchDir,
    ) -> BulkResult<Vec<PendingPair>> {
        let scratch_path = scratch.path().display().to_string();
        let scope = ObservationScope::new("BULK_UNPACK", &[("scratch", scratch_path.as_str())]);

        match self.collect_entries(file, archive_path, scratch) {
            Ok(table) => {
                scope.complete(&[("pairs", table.len().to_string().as_str())]);
                Ok(table.into_pairs())
            }
            Err(err) => {
                scope.fail(err.code());
                Err(err)
            }
        }
    }

    fn collect_entries(
        &self,
        mut file: File,
        archive_path: &Path,
        scratch: &ScratchDir,
    ) -> BulkResult<PairTable> {
        let read_error = |source: io::Error| ArchiveError::Read {
            path: archive_path.to_path_buf(),
            source,
        };

        let mut table = PairTable::default();
        let collected = match ArchiveFormat::detect(&mut file).map_err(read_error)? {
            ArchiveFormat::Tar => self.collect_tar(file, scratch, &mut table),
            ArchiveFormat::Zip => self.collect_zip(file, scratch, &mut table),
        };
        collected.map_err(read_error)?;

        Ok(table)
    }

    /// Errors returned here are archive-level; entry problems go to `table`
    fn collect_tar(
        &self,
        file: File,
        scratch: &ScratchDir,
        table: &mut PairTable,
    ) -> io::Result<()> {
        let mut archive = Archive::new(file);

        for (position, entry) in archive.entries()?.enumerate() {
            let mut entry = entry?;

            let kind = entry.header().entry_type();
            let shape = if kind.is_file() || kind.is_contiguous() || kind.is_gnu_sparse() {
                EntryShape::Regular
            } else if kind.is_symlink()
                || kind.is_hard_link()
                || kind.is_character_special()
                || kind.is_block_special()
                || kind.is_fifo()
            {
                EntryShape::Special
            } else {
                continue;
            };

            let name = match entry.path() {
                Ok(path) => normalize_entry_path(&path.to_string_lossy()),
                Err(e) => {
                    let label = format!("entry #{}", position + 1);
                    table.fail(&label, None, PairError::unreadable(&label, e));
                    continue;
                }
            };

            self.collect_entry(table, scratch, name, shape, &mut entry);
        }

        Ok(())
    }

    fn collect_zip(
        &self,
        file: File,
        scratch: &ScratchDir,
        table: &mut PairTable,
    ) -> io::Result<()> {
        let mut archive = ZipArchive::new(file)?;

        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(ZipError::UnsupportedArchive(reason)) => {
                    let label = format!("entry #{}", index + 1);
                    table.fail(&label, None, PairError::unreadable(&label, reason));
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if entry.is_dir() {
                continue;
            }
            let shape = match entry.unix_mode().map(|mode| mode & S_IFMT) {
                Some(format) if format != 0 && format != S_IFREG => EntryShape::Special,
                _ => EntryShape::Regular,
            };
            let name = normalize_entry_path(entry.name());

            self.collect_entry(table, scratch, name, shape, &mut entry);
        }

        Ok(())
    }

    fn collect_entry(
        &self,
        table: &mut PairTable,
        scratch: &ScratchDir,
        name: String,
        shape: EntryShape,
        reader: &mut dyn Read,
    ) {
        match self.convention.classify(&name) {
            EntryClass::Ignored => {}
            // Links and devices that are not pair members are skipped
            EntryClass::Mismatch { .. } if shape == EntryShape::Special => {}
            EntryClass::Mismatch { expected } => {
                let err = PairError::NamingMismatch {
                    entry: name.clone(),
                    expected,
                };
                table.fail(&name, None, err);
            }
            EntryClass::Member {
                pair_id,
                variant,
                kind,
            } if table.contains(&pair_id, kind) => {
                table.fail(&pair_id, Some(&variant), PairError::DuplicateEntry(name));
            }
            EntryClass::Member {
                pair_id, variant, ..
            } if shape == EntryShape::Special => {
                let err = PairError::unreadable(&name, "not a regular file");
                table.fail(&pair_id, Some(&variant), err);
            }
            EntryClass::Member {
                pair_id,
                variant,
                kind,
            } => match scratch.write_entry(&name, reader) {
                Ok(path) => {
                    table.add(&pair_id, &variant, kind, Extracted { entry: name, path });
                }
                Err(e) => {
                    table.fail(&pair_id, Some(&variant), PairError::unreadable(&name, e));
                }
            },
        }
    }

    fn run_pairs(&self, pairs: Vec<PendingPair>) -> Vec<PairReport> {
        let workers = self.workers.min(pairs.len()).max(1);
        if workers == 1 {
            return pairs.into_iter().map(PendingPair::into_report).collect();
        }

        let mut buckets: Vec<Vec<(usize, PendingPair)>> =
            (0..workers).map(|_| Vec::new()).collect();
        for (position, pair) in pairs.into_iter().enumerate() {
            buckets[position % workers].push((position, pair));
        }

        let mut reports: Vec<(usize, PairReport)> = thread::scope(|scope| {
            let handles: Vec<_> = buckets
                .into_iter()
                .map(|bucket| {
                    scope.spawn(move || {
                        bucket
                            .into_iter()
                            .map(|(position, pair)| (position, pair.into_report()))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });

        reports.sort_by_key(|(position, _)| *position);
        reports.into_iter().map(|(_, report)| report).collect()
    }
}
