/// Line-oriented output sink.
///
/// The doctor only relies on "a line was emitted"; colouring is applied by
/// the caller before handing the text over.
pub trait Console: Send + Sync {
    fn line(&self, text: &str);

    fn blank(&self) {
        self.line("");
    }
}

pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn line(&self, text: &str) {
        println!("{}", text);
    }
}

/// For human-readable text that must stay out of machine output on stdout.
pub struct StderrConsole;

impl Console for StderrConsole {
    fn line(&self, text: &str) {
        eprintln!("{}", text);
    }
}
