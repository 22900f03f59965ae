use crate::error::Result;
use crate::infrastructure::in_memory::PageEvent;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct EventRecord<'a> {
    step: usize,
    action: &'a str,
    event: &'a str,
    target: &'a str,
    detail: &'a str,
}

/// Writes the page event log as CSV (`step,action,event,target,detail`).
///
/// The header is written with the first row, or by [`EventWriter::finish`]
/// when there were no rows at all.
pub struct EventWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> EventWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
            rows: 0,
        }
    }

    pub fn write_event(&mut self, step: usize, action: &str, event: &PageEvent) -> Result<()> {
        self.write_row(step, action, event.name(), &event.target(), &event.detail())
    }

    pub fn write_row(
        &mut self,
        step: usize,
        action: &str,
        event: &str,
        target: &str,
        detail: &str,
    ) -> Result<()> {
        self.writer.serialize(EventRecord {
            step,
            action,
            event,
            target,
            detail,
        })?;
        self.rows += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        if self.rows == 0 {
            self.writer
                .write_record(["step", "action", "event", "target", "detail"])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::FormKind;

    #[test]
    fn test_writer_emits_header_and_rows() {
        let mut buffer = Vec::new();
        {
            let mut writer = EventWriter::new(&mut buffer);
            writer
                .write_event(1, "submit", &PageEvent::Blocked(FormKind::Checkout))
                .unwrap();
            writer
                .write_event(
                    1,
                    "submit",
                    &PageEvent::NoticeShown("Declined, try again".to_string()),
                )
                .unwrap();
            writer.finish().unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "step,action,event,target,detail");
        assert_eq!(lines[1], "1,submit,blocked,checkout,");
        assert_eq!(lines[2], "1,submit,notice_shown,,\"Declined, try again\"");
    }

    #[test]
    fn test_writer_header_only() {
        let mut buffer = Vec::new();
        EventWriter::new(&mut buffer).finish().unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "step,action,event,target,detail\n");
    }
}
