use std::io::{self, Write};
use std::sync::LazyLock;
use indicatif::{MultiProgress, ProgressDrawTarget};
use tracing_subscriber::fmt::MakeWriter;

static LIVE_VIEW: LazyLock<MultiProgress> =
    LazyLock::new(|| MultiProgress::with_draw_target(ProgressDrawTarget::stdout()));

/// The process-wide live table. Log output is interleaved with it through
/// [`LogWriter`].
pub(crate) fn live_view() -> MultiProgress {
    LIVE_VIEW.clone()
}

/// `tracing` writer that hides the live table while each log record is written.
#[derive(Clone)]
pub struct LogWriter<M = fn() -> io::Stderr> {
    multi: MultiProgress,
    inner: M,
}

impl LogWriter {
    pub fn stderr() -> Self {
        Self::new(live_view(), io::stderr)
    }
}

impl<M> LogWriter<M> {
    pub fn new(multi: MultiProgress, inner: M) -> Self {
        Self { multi, inner }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for LogWriter<M> {
    type Writer = Suspended<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        Suspended {
            multi: self.multi.clone(),
            inner: self.inner.make_writer(),
        }
    }
}

pub struct Suspended<W> {
    multi: MultiProgress,
    inner: W,
}

impl<W: Write> Write for Suspended<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.multi.suspend(|| inner.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
