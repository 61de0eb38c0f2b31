use std::any::Any;
use std::fmt::{Debug, Display};

use codespan_reporting::diagnostic;
use codespan_reporting::files::{self, SimpleFile};
use codespan_reporting::term;
use termcolor::WriteColor;

use crate::span::FreeSpan;


/// User-facing reporting for Diagnostics
pub trait Report: Debug {
    /// Reports the error to stderr with the default settings
    fn report(&self, source: &str);

    /// Renders the report for the file `name` into `writer`
    fn report_to(
        &self,
        name: &str,
        source: &str,
        writer: &mut dyn WriteColor,
    ) -> Result<(), files::Error>;
}

/// Error with a source location, every Diagnostic is reported at error severity
pub trait Diagnostic: Any + Debug {
    /// Concise description shown in the header of the report
    fn message(&self) -> String;

    /// Labeled snippets of the source with further details
    fn labels(&self) -> Vec<Label> {
        Vec::new()
    }

    /// Further details of the diagnostic
    ///
    /// Usually start with `note: ` or `help: `.
    fn notes(&self) -> Vec<String> {
        Vec::new()
    }
}


impl<D> Report for D
where
    D: Diagnostic,
{
    fn report(&self, source: &str) {
        use termcolor::{ColorChoice, StandardStream};

        let stderr = StandardStream::stderr(ColorChoice::Auto);
        let mut stderr = stderr.lock();
        if let Err(err) = self.report_to("<input>", source, &mut stderr) {
            tracing::warn!(%err, "failed to emit diagnostic");
        }
    }

    fn report_to(
        &self,
        name: &str,
        source: &str,
        writer: &mut dyn WriteColor,
    ) -> Result<(), files::Error> {
        let file = SimpleFile::new(name, source);

        let diagnostic = diagnostic::Diagnostic {
            severity: diagnostic::Severity::Error,
            code: None,
            message: self.message(),
            labels: self
                .labels()
                .into_iter()
                .map(Label::into_codespan_label)
                .collect(),
            notes: self.notes(),
        };

        writeln!(writer)?;
        term::emit(writer, &term::Config::default(), &file, &diagnostic)
    }
}


pub struct Label {
    span: FreeSpan,
    message: String,
}

impl Label {
    /// Create a primary label for the diagnostic, there should be exactly one
    /// per Report
    pub fn primary(span: FreeSpan, message: impl Display) -> Label {
        Label {
            span,
            message: message.to_string(),
        }
    }

    fn into_codespan_label(self) -> diagnostic::Label<()> {
        diagnostic::Label {
            style: diagnostic::LabelStyle::Primary,
            file_id: (),
            range: self.span.range(),
            message: self.message,
        }
    }
}
