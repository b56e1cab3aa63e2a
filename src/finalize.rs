//! Collapses the frame tree into the pure value tree once the whole
//! document has been absorbed. By this point every `Dotted` frame has
//! been sealed, so a frame's kind carries no more information; only
//! `FrameArray`'s reversed storage still needs undoing.

use crate::frame::{Frame, FrameMap};
use crate::value::{Table, Value};

pub fn finalize(frame: FrameMap) -> Table {
    frame
        .into_iter()
        .map(|(key, frame)| (key, finalize_frame(frame)))
        .collect()
}

fn finalize_frame(frame: Frame) -> Value {
    match frame {
        Frame::FrameValue(v) => v,
        Frame::FrameTable(_, m) => Value::Table(finalize(m)),
        Frame::FrameArray(mut elements) => {
            elements.reverse();
            Value::Array(
                elements
                    .into_iter()
                    .map(|m| Value::Table(finalize(m)))
                    .collect(),
            )
        }
    }
}
