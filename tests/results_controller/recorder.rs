//! Consumer that records every event it receives as a string.

#![allow(dead_code)]

use std::sync::Mutex;

use mate_stores::model::MateEvent;
use mate_stores::{ObjectChange, ResultsControllerConsumer, SectionChange};

#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ResultsControllerConsumer<MateEvent> for Recorder {
    fn will_change_content(&self) {
        self.push("will_change".into());
    }

    fn did_change_section(&self, change: &SectionChange) {
        match change {
            SectionChange::Insert { index, name } => {
                self.push(format!("section+ {} {}", index, name))
            }
            SectionChange::Delete { index, name } => {
                self.push(format!("section- {} {}", index, name))
            }
        }
    }

    fn did_change_object(&self, object: &MateEvent, change: &ObjectChange) {
        let id = object.event_id;
        match change {
            ObjectChange::Insert { new_index_path } => {
                self.push(format!("insert {} at {}", id, new_index_path.row))
            }
            ObjectChange::Delete { index_path } => {
                self.push(format!("delete {} at {}", id, index_path.row))
            }
            ObjectChange::Move { from, to } => {
                self.push(format!("move {} {}->{}", id, from.row, to.row))
            }
            ObjectChange::Update { index_path } => {
                self.push(format!("update {} at {}", id, index_path.row))
            }
        }
    }

    fn did_change_content(&self) {
        self.push("did_change".into());
    }

    fn did_reset_content(&self) {
        self.push("reset".into());
    }
}
