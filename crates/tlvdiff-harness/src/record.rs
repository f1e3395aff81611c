use std::fmt;
use std::io::{self, Write};

use tlvdiff_decoder::DecodeError;
use tlvdiff_wire::hex::to_hex;

/// Which codec call failed during a round trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodecStage {
    /// `serialize(node)`, producing the first encoding.
    Serialize,
    /// `decode(first)`.
    Decode,
    /// `serialize(decoded)`, producing the second encoding.
    Reserialize,
}

impl fmt::Display for CodecStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Serialize => "serialize",
            Self::Decode => "decode",
            Self::Reserialize => "reserialize",
        })
    }
}

/// Result of one round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Both encodings matched. `summary` describes the re-decoded tree.
    Stable { summary: String },

    /// The encodings differ. This is the finding the harness hunts for.
    Diverged {
        summary: String,
        first: Vec<u8>,
        second: Vec<u8>,
    },

    /// The random buffer did not fit the bounded grammar. Expected for
    /// most inputs and not a finding.
    LocalDecodeFailed(DecodeError),

    /// The codec under test refused a tree or its own output.
    CodecFailed { stage: CodecStage, error: String },
}

impl Outcome {
    #[must_use]
    pub fn is_divergence(&self) -> bool {
        matches!(self, Self::Diverged { .. })
    }
}

/// One iteration's input and what happened to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationRecord {
    /// Zero-based iteration number within its run.
    pub index: usize,

    /// Generator state before the input was drawn. Seeding a fresh run
    /// with it reproduces this iteration as iteration 0.
    pub replay_seed: u64,

    pub input: Vec<u8>,
    pub outcome: Outcome,
}

impl IterationRecord {
    /// Write this record's report lines.
    ///
    /// ```text
    /// <input-hex> == <summary>
    /// <input-hex> != <summary>
    /// <first-hex>
    /// <second-hex>
    /// <input-hex> <decode error>
    /// <input-hex> <stage> failed: <codec error>
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates write failures from `sink`.
    pub fn write_report<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        let input = to_hex(&self.input);
        match &self.outcome {
            Outcome::Stable { summary } => writeln!(sink, "{input} == {summary}"),
            Outcome::Diverged {
                summary,
                first,
                second,
            } => {
                writeln!(sink, "{input} != {summary}")?;
                writeln!(sink, "{}", to_hex(first))?;
                writeln!(sink, "{}", to_hex(second))
            }
            Outcome::LocalDecodeFailed(error) => writeln!(sink, "{input} {error}"),
            Outcome::CodecFailed { stage, error } => {
                writeln!(sink, "{input} {stage} failed: {error}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(outcome: Outcome) -> String {
        let record = IterationRecord {
            index: 0,
            replay_seed: 1,
            input: vec![0x05, 0x00, 0xFF],
            outcome,
        };
        let mut out = Vec::new();
        record.write_report(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn stable_line() {
        let line = render(Outcome::Stable {
            summary: "NULL()".into(),
        });
        assert_eq!(line, "0500ff == NULL()\n");
    }

    #[test]
    fn divergence_spans_three_lines() {
        let text = render(Outcome::Diverged {
            summary: "NULL()".into(),
            first: vec![0x05, 0x00],
            second: vec![0x05, 0x01, 0x00],
        });
        assert_eq!(text, "0500ff != NULL()\n0500\n050100\n");
    }

    #[test]
    fn failure_lines() {
        assert_eq!(
            render(Outcome::LocalDecodeFailed(DecodeError::InsufficientTag { offset: 3 })),
            "0500ff insufficient data for tag at offset 3\n"
        );
        assert_eq!(
            render(Outcome::CodecFailed {
                stage: CodecStage::Decode,
                error: "boom".into(),
            }),
            "0500ff decode failed: boom\n"
        );
    }
}
