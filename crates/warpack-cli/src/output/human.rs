//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use warpack_core::PackReport;

/// Styled terminal output. Results go to stdout, warnings to stderr.
pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    /// Creates a formatter honouring `--verbose` and `--quiet`.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_pack_result(&self, report: &PackReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Standalone archive created: {}",
                style("✓").green().bold(),
                report.output_path.display()
            ));
        } else {
            let _ = self.term.write_line(&format!(
                "Standalone archive created: {}",
                report.output_path.display()
            ));
        }

        let _ = self.term.write_line(&format!(
            "  Entries written:  {}",
            Self::format_number(report.entries_written)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_written)
        ));

        if report.files_overwritten > 0 {
            let _ = self.term.write_line(&format!(
                "  Overwritten:      {}",
                Self::format_number(report.files_overwritten)
            ));
        }

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  From launcher:    {}",
                Self::format_number(report.launcher_files)
            ));
            let _ = self.term.write_line(&format!(
                "  From application: {}",
                Self::format_number(report.application_files)
            ));
            let _ = self
                .term
                .write_line(&format!("  Skipped:          {}", report.entries_skipped));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        for warning in &report.warnings {
            self.format_warning(warning);
        }

        Ok(())
    }

    fn format_status(&self, target: &str, reply: Option<&str>) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let _ = self
            .term
            .write_line(&format!("Connection established with {target}"));
        match reply {
            Some(reply) => {
                let _ = self.term.write_line(reply);
            }
            None => self.format_warning("instance closed the connection without replying"),
        }

        Ok(())
    }

    fn format_success(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
        assert_eq!(HumanFormatter::format_size(2 * 1024 * 1024), "2.0 MB");
        assert_eq!(HumanFormatter::format_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(999), "999");
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }
}
