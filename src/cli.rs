use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "memzip")]
#[command(version)]
#[command(about = "A Rust unzip utility for in-memory decoding of ZIP archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  memzip data1.zip -x joe        extract all files except joe from data1.zip\n  \
  memzip -p foo.zip | more       send contents of foo.zip via pipe into more\n  \
  memzip -v -c shift_jis old.zip list an archive with Shift-JIS file names")]
pub struct Cli {
    /// ZIP file path
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Files to extract (default: all)
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely/show version info
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract files to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Display archive comment only
    #[arg(short = 'z')]
    pub comment: bool,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Exclude files that follow
    #[arg(short = 'x', value_name = "FILE", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Junk paths (do not make directories)
    #[arg(short = 'j')]
    pub junk_paths: bool,

    /// Charset of file names not flagged as UTF-8
    #[arg(short = 'c', long = "charset", value_name = "NAME", default_value = "utf-8")]
    pub charset: String,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Resolve [`charset`](Self::charset) to an encoding, `None` for unknown labels.
    pub fn encoding(&self) -> Option<&'static encoding_rs::Encoding> {
        encoding_rs::Encoding::for_label(self.charset.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unzip_style_flags() {
        let cli = Cli::try_parse_from(["memzip", "-l", "-c", "cp1252", "a.zip", "x.txt"]).unwrap();
        assert!(cli.list);
        assert_eq!(cli.file, "a.zip");
        assert_eq!(cli.files, vec!["x.txt"]);
        assert_eq!(cli.encoding(), Some(encoding_rs::WINDOWS_1252));
    }

    #[test]
    fn pipe_implies_quiet() {
        let cli = Cli::try_parse_from(["memzip", "-p", "a.zip"]).unwrap();
        assert!(cli.is_quiet());
        assert!(!cli.is_very_quiet());
        assert_eq!(cli.encoding(), Some(encoding_rs::UTF_8));
    }

    #[test]
    fn unknown_charset_has_no_encoding() {
        let cli = Cli::try_parse_from(["memzip", "--charset", "klingon", "a.zip"]).unwrap();
        assert_eq!(cli.encoding(), None);
    }
}
