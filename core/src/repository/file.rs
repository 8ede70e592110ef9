use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use crate::error::PersistenceError;
use crate::model::task::Task;
use crate::repository::traits::TaskRepository;

const SLOT_FILE_NAME: &str = "tasks.json";

/// File-backed stand-in for the browser's local storage: the whole
/// collection serialized as a JSON array under one fixed file.
#[derive(Clone)]
pub struct FileTaskRepository {
    slot_path: PathBuf,
}

impl FileTaskRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self, PersistenceError> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir().ok_or_else(|| {
                    PersistenceError::Io(std::io::Error::new(
                        ErrorKind::NotFound,
                        "could not determine home directory",
                    ))
                })?;
                home_dir.join(".taskdeck")
            }
        };
        fs::create_dir_all(&path)?;
        path.push(SLOT_FILE_NAME);
        Ok(FileTaskRepository { slot_path: path })
    }

    pub fn slot_path(&self) -> &PathBuf {
        &self.slot_path
    }
}

impl TaskRepository for FileTaskRepository {
    fn load(&self) -> Result<Vec<Task>, PersistenceError> {
        let file = match File::open(&self.slot_path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(PersistenceError::Deserialize)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let file = File::create(&self.slot_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tasks).map_err(PersistenceError::Serialize)?;
        writer.flush()?;
        Ok(())
    }
}
