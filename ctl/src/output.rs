use std::io::{self, Stdout, Write};

use sentinel_client::ListView;
use serde::Serialize;
use tracing::{debug, warn};

/// Prints every row the controller renders as one JSON object per line.
pub struct JsonLinesView<W> {
    out: W,
}

impl JsonLinesView<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_rows<T: Serialize>(&mut self, items: &[T]) {
        for item in items {
            let written = serde_json::to_string(item)
                .map_err(io::Error::from)
                .and_then(|line| writeln!(self.out, "{line}"));

            if let Err(err) = written {
                warn!(error = %err, "failed to write row");
                return;
            }
        }

        if let Err(err) = self.out.flush() {
            warn!(error = %err, "failed to flush rows");
        }
    }
}

impl<T, W> ListView<T> for JsonLinesView<W>
where
    T: Serialize,
    W: Write + Send,
{
    fn replace(&mut self, items: &[T]) {
        self.write_rows(items);
    }

    fn append(&mut self, items: &[T]) {
        self.write_rows(items);
    }

    fn set_load_more(&mut self, armed: bool) {
        debug!(armed, "load more");
    }
}
