use serde::{Deserialize, Serialize};

/// One to-do record. The serialized field names are camelCase so the
/// stored JSON stays byte-compatible with the slot format the web
/// frontend wrote (`dueDate`, not `due_date`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unix time in milliseconds at creation, bumped past the previous
    /// maximum on collision. Unique for the collection's lifetime.
    pub id: i64,
    pub text: String,
    pub completed: bool,

    // 期日はNaiveDateではなくStringのまま保持する。
    // 既存スロットには検証前の値が混ざっている可能性があり、
    // 読み込みで落とすより、表示・検索はそのまま通して
    // 検証は編集・更新の経路で行う。
    pub due_date: String,

    #[serde(default)]
    pub description: String,
}

impl Task {
    pub fn new(id: i64, text: String, description: String, due_date: String) -> Self {
        Self {
            id,
            text,
            completed: false,
            due_date,
            description,
        }
    }

    /// Case-insensitive identity of the task text, the key the
    /// duplicate rule is enforced over.
    pub fn text_key(&self) -> String {
        self.text.trim().to_lowercase()
    }
}
