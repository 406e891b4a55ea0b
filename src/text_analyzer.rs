//! Word cross-referencing over line-oriented text.
//!
//! [`TextAnalyzer`] indexes every word of its input by the lines it occurs
//! on and prints that index as a two-column table:
//!
//! ```
//! use cross_refs::TextAnalyzer;
//!
//! let mut analyzer = TextAnalyzer::new();
//! analyzer.analyze("b c a d\ne s g a\n".as_bytes()).unwrap();
//!
//! let mut report = Vec::new();
//! analyzer.print_analysis(&mut report).unwrap();
//! let report = String::from_utf8(report).unwrap();
//!
//! let mut rows = report.lines().skip(1);
//! assert_eq!(rows.next(), Some("a     1 2 "));
//! assert_eq!(rows.next(), Some("b     1 "));
//! ```

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::string::String;

use log::{debug, trace};

use crate::{RBTreeMap, UniqueList};

const WORD_HEADER: &str = "Word";
const LINES_HEADER: &str = "Lines";
const MIN_WORD_COLUMN: usize = 6;

/// Failure of a [`TextAnalyzer`] operation.
#[derive(Debug)]
pub enum AnalysisError {
    /// The input file could not be opened.
    Open { path: PathBuf, source: io::Error },
    /// The output file could not be created.
    Create { path: PathBuf, source: io::Error },
    /// Reading the input failed part way.
    Read(io::Error),
    /// Writing the output failed part way.
    Write(io::Error),
    /// Input and output name the same file.
    SameFile(PathBuf),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, .. } => write!(f, "can't open file {}", path.display()),
            Self::Create { path, .. } => write!(f, "can't create output file {}", path.display()),
            Self::Read(_) => f.write_str("failed to read input"),
            Self::Write(_) => f.write_str("failed to write output"),
            Self::SameFile(path) => write!(
                f,
                "can't output enumerated text to the file it was read from: {}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Create { source, .. } => Some(source),
            Self::Read(source) | Self::Write(source) => Some(source),
            Self::SameFile(_) => None,
        }
    }
}

/// Builds and prints a word → line-numbers index.
///
/// Words are maximal runs of ASCII letters and digits, folded to lowercase.
/// Everything else, including non-ASCII characters and `_`, separates words.
/// Lines are numbered from 1 and empty lines still take a number.
#[derive(Debug, Default)]
pub struct TextAnalyzer {
    dictionary: RBTreeMap<String, UniqueList<usize>>,
}

impl TextAnalyzer {
    /// Makes an analyzer with an empty index. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dictionary: RBTreeMap::new(),
        }
    }

    /// The index built by the last [`analyze`](Self::analyze) call.
    #[must_use]
    pub fn dictionary(&self) -> &RBTreeMap<String, UniqueList<usize>> {
        &self.dictionary
    }

    /// Replaces the index with one built from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Read`] if reading fails. The index then
    /// holds whatever was read before the failure.
    pub fn analyze<R: BufRead>(&mut self, reader: R) -> Result<(), AnalysisError> {
        self.dictionary.clear();

        let mut line_count = 0;
        for (index, line) in reader.split(b'\n').enumerate() {
            let line = line.map_err(AnalysisError::Read)?;
            let number = index + 1;
            line_count = number;

            let mut tokens = 0;
            for word in words(&line) {
                tokens += 1;
                if self.dictionary.contains(word.as_str()) {
                    self.dictionary[word.as_str()].push_back(number);
                } else {
                    self.dictionary.insert(word, [number].into_iter().collect());
                }
            }
            trace!("line {number}: {tokens} words");
        }

        debug!(
            "analyzed {line_count} lines, {} distinct words",
            self.dictionary.len()
        );
        Ok(())
    }

    /// Opens `path` and analyzes its contents.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Open`] if the file can't be opened, or
    /// [`AnalysisError::Read`] if reading it fails.
    pub fn analyze_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), AnalysisError> {
        let path = path.as_ref();
        self.dictionary.clear();
        let file = File::open(path).map_err(|source| AnalysisError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("analyzing {}", path.display());
        self.analyze(BufReader::new(file))
    }

    /// Writes the index as a table, one word per row in ascending order.
    ///
    /// The first row is a header. Each word is left-aligned in a column one
    /// wider than the longest word (at least six wide) and is followed by
    /// its line numbers, each with a trailing space.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Write`] if writing fails.
    pub fn print_analysis<W: Write>(&self, mut writer: W) -> Result<(), AnalysisError> {
        let width = self
            .dictionary
            .keys()
            .map(|word| word.len() + 1)
            .max()
            .unwrap_or(0)
            .max(MIN_WORD_COLUMN);

        writeln!(writer, "{WORD_HEADER:<width$}{LINES_HEADER}").map_err(AnalysisError::Write)?;
        for (word, lines) in &self.dictionary {
            write!(writer, "{word:<width$}").map_err(AnalysisError::Write)?;
            for line in lines {
                write!(writer, "{line} ").map_err(AnalysisError::Write)?;
            }
            writeln!(writer).map_err(AnalysisError::Write)?;
        }
        writer.flush().map_err(AnalysisError::Write)
    }

    /// Creates (or truncates) `path` and prints the index into it.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Create`] if the file can't be created, or
    /// [`AnalysisError::Write`] if writing it fails.
    pub fn print_analysis_file<P: AsRef<Path>>(&self, path: P) -> Result<(), AnalysisError> {
        let path = path.as_ref();
        let file = create(path)?;
        debug!("writing analysis to {}", path.display());
        self.print_analysis(BufWriter::new(file))
    }

    /// Copies the non-empty lines of `reader` to `writer`, each prefixed by
    /// its position among the non-empty lines: `"1) "`, `"2) "`, ...
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Read`] or [`AnalysisError::Write`] on I/O
    /// failure.
    pub fn enumerate_lines<R: BufRead, W: Write>(
        reader: R,
        mut writer: W,
    ) -> Result<(), AnalysisError> {
        let mut number = 0usize;
        for line in reader.split(b'\n') {
            let line = line.map_err(AnalysisError::Read)?;
            if line.is_empty() {
                continue;
            }
            number += 1;
            write!(writer, "{number}) ").map_err(AnalysisError::Write)?;
            writer.write_all(&line).map_err(AnalysisError::Write)?;
            writer.write_all(b"\n").map_err(AnalysisError::Write)?;
        }
        debug!("enumerated {number} lines");
        writer.flush().map_err(AnalysisError::Write)
    }

    /// File form of [`enumerate_lines`](Self::enumerate_lines).
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::SameFile`] if both paths name the same file,
    /// before either is touched. Otherwise fails like
    /// [`analyze_file`](Self::analyze_file) and
    /// [`print_analysis_file`](Self::print_analysis_file).
    pub fn enumerate_lines_file<P, Q>(input: P, output: Q) -> Result<(), AnalysisError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let (input, output) = (input.as_ref(), output.as_ref());
        if same_file(input, output) {
            return Err(AnalysisError::SameFile(input.to_path_buf()));
        }

        let reader = File::open(input).map_err(|source| AnalysisError::Open {
            path: input.to_path_buf(),
            source,
        })?;
        let writer = create(output)?;
        debug!(
            "enumerating {} into {}",
            input.display(),
            output.display()
        );
        Self::enumerate_lines(BufReader::new(reader), BufWriter::new(writer))
    }
}

fn create(path: &Path) -> Result<File, AnalysisError> {
    File::create(path).map_err(|source| AnalysisError::Create {
        path: path.to_path_buf(),
        source,
    })
}

/// Whether `a` and `b` name one file, including through hard links.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        if let (Ok(a), Ok(b)) = (fs::metadata(a), fs::metadata(b)) {
            return a.dev() == b.dev() && a.ino() == b.ino();
        }
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Lowercased runs of ASCII alphanumerics in `line`.
fn words(line: &[u8]) -> impl Iterator<Item = String> + '_ {
    line.split(|byte| !byte.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.iter().map(|&byte| char::from(byte.to_ascii_lowercase())).collect())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::string::ToString;
    use std::vec;
    use std::vec::Vec;

    fn index_of(text: &str) -> Vec<(String, Vec<usize>)> {
        let mut analyzer = TextAnalyzer::new();
        analyzer.analyze(text.as_bytes()).unwrap();
        analyzer
            .dictionary()
            .iter()
            .map(|(word, lines)| (word.clone(), lines.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn words_split_on_anything_but_ascii_alphanumerics() {
        let found: Vec<String> = words("a?-<b c?в.D9,_e".as_bytes()).collect();
        assert_eq!(found, ["a", "b", "c", "d9", "e"]);
        assert_eq!(words(b"").count(), 0);
        assert_eq!(words(b" ,; ").count(), 0);
    }

    #[test]
    fn repeated_word_on_one_line_is_listed_once() {
        assert_eq!(
            index_of("a a a\nb a"),
            vec![("a".to_string(), vec![1, 2]), ("b".to_string(), vec![2])]
        );
    }

    #[test]
    fn analyze_replaces_the_previous_index() {
        let mut analyzer = TextAnalyzer::new();
        analyzer.analyze("old words".as_bytes()).unwrap();
        analyzer.analyze("new".as_bytes()).unwrap();
        assert_eq!(analyzer.dictionary().len(), 1);
        assert!(analyzer.dictionary().contains("new"));
    }

    #[test]
    fn column_widens_for_long_words() {
        let mut analyzer = TextAnalyzer::new();
        analyzer.analyze("ab\nlengthy".as_bytes()).unwrap();
        let mut out = Vec::new();
        analyzer.print_analysis(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Word    Lines\nab      1 \nlengthy 2 \n"
        );
    }

    #[test]
    fn empty_input_prints_only_the_header() {
        let analyzer = TextAnalyzer::new();
        let mut out = Vec::new();
        analyzer.print_analysis(&mut out).unwrap();
        assert_eq!(out, b"Word  Lines\n");
    }

    #[test]
    fn enumerate_skips_empty_lines() {
        let mut out = Vec::new();
        TextAnalyzer::enumerate_lines(Cursor::new("first\n\nsecond\n\n\nthird"), &mut out)
            .unwrap();
        assert_eq!(out, b"1) first\n2) second\n3) third\n");
    }

    #[test]
    fn io_causes_are_exposed() {
        use std::error::Error as _;

        let err = AnalysisError::Read(io::Error::other("boom"));
        assert_eq!(err.to_string(), "failed to read input");
        assert_eq!(err.source().unwrap().to_string(), "boom");
        assert!(AnalysisError::SameFile(PathBuf::from("x")).source().is_none());
    }
}
