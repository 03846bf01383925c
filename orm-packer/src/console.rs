/// Log output that shares the terminal with the batch progress bar.
use indicatif::ProgressBar;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Hands out writers that clear the progress bar while an event is written.
/// Every event becomes one `write_all`, so lines never interleave with a redraw.
#[derive(Clone)]
pub struct ProgressWriter<M> {
    bar: ProgressBar,
    inner: M,
}

impl<M> ProgressWriter<M> {
    pub fn new(bar: ProgressBar, inner: M) -> Self {
        Self { bar, inner }
    }
}

impl<'a, M> MakeWriter<'a> for ProgressWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SuspendingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendingWriter {
            bar: self.bar.clone(),
            inner: self.inner.make_writer(),
        }
    }
}

pub struct SuspendingWriter<W> {
    bar: ProgressBar,
    inner: W,
}

impl<W: Write> Write for SuspendingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.flush())
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging(bar: &ProgressBar) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ProgressWriter::new(bar.clone(), io::stdout))
        .init();
}
