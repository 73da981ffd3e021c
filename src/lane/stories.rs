//! Written and recorded life stories, plus the prompt list offered to storytellers.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::activity::write_activity;
use super::types::{Story, StoryInput};
use crate::error::{LaneError, Result};

/// Prompts shown to help someone start a story.
pub const STORY_PROMPTS: &[&str] = &[
    "What is your earliest childhood memory?",
    "Tell me about the house you grew up in.",
    "How did you meet your partner?",
    "What was your first job, and what did you learn from it?",
    "Describe a holiday tradition your family kept.",
    "Who was your best friend growing up?",
    "What is the proudest moment of your life?",
    "Tell me about a place you traveled that you never forgot.",
    "What song always takes you back to a certain time?",
    "What advice would you give your younger self?",
    "Describe the day one of your children was born.",
    "What did your neighborhood look like when you were young?",
];

const STORY_COLUMNS: &str = "id, title, type, content, category, created_at, updated_at";

fn story_from_row(row: &Row) -> rusqlite::Result<Story> {
    let story_type: String = row.get(2)?;
    Ok(Story {
        id: row.get(0)?,
        title: row.get(1)?,
        story_type: story_type.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
        })?,
        content: row.get(3)?,
        category: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// All stories, newest first.
pub fn list_stories(conn: &Connection) -> Result<Vec<Story>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STORY_COLUMNS} FROM stories ORDER BY created_at DESC, id DESC"
    ))?;
    let stories = stmt
        .query_map([], story_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(stories)
}

pub fn get_story(conn: &Connection, id: &str) -> Result<Story> {
    conn.query_row(
        &format!("SELECT {STORY_COLUMNS} FROM stories WHERE id = ?1"),
        params![id],
        story_from_row,
    )
    .optional()?
    .ok_or_else(|| LaneError::not_found("story", id))
}

pub fn create_story(conn: &mut Connection, input: &StoryInput) -> Result<Story> {
    let title = super::required("title", &input.title)?;
    let id = super::new_id();
    let now = super::now();

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO stories (id, title, type, content, category, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            id,
            title,
            input.story_type.as_str(),
            input.content,
            super::category_or_default(input.category.as_deref()),
            now,
        ],
    )?;
    write_activity(
        &tx,
        "create",
        "story",
        &id,
        Some(&serde_json::json!({"type": input.story_type.as_str()})),
    )?;
    tx.commit()?;

    get_story(conn, &id)
}

/// Replace title, type, content and category. The id and creation time are kept.
pub fn update_story(conn: &mut Connection, id: &str, input: &StoryInput) -> Result<Story> {
    let title = super::required("title", &input.title)?;

    let tx = conn.transaction()?;
    let rows = tx.execute(
        "UPDATE stories SET title = ?1, type = ?2, content = ?3, category = ?4, updated_at = ?5 \
         WHERE id = ?6",
        params![
            title,
            input.story_type.as_str(),
            input.content,
            super::category_or_default(input.category.as_deref()),
            super::now(),
            id,
        ],
    )?;
    if rows == 0 {
        return Err(LaneError::not_found("story", id));
    }
    write_activity(&tx, "update", "story", id, None)?;
    tx.commit()?;

    get_story(conn, id)
}

pub fn delete_story(conn: &mut Connection, id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    let rows = tx.execute("DELETE FROM stories WHERE id = ?1", params![id])?;
    if rows == 0 {
        return Err(LaneError::not_found("story", id));
    }
    write_activity(&tx, "delete", "story", id, None)?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::types::StoryType;

    #[test]
    fn update_keeps_created_at() {
        let mut conn = crate::db::open_memory_database().unwrap();
        let original = create_story(
            &mut conn,
            &StoryInput {
                title: "Draft".into(),
                story_type: StoryType::Written,
                content: "Once".into(),
                category: None,
            },
        )
        .unwrap();

        let updated = update_story(
            &mut conn,
            &original.id,
            &StoryInput {
                title: "Final".into(),
                story_type: StoryType::Audio,
                content: "T2dnUw==".into(),
                category: Some("childhood".into()),
            },
        )
        .unwrap();

        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.story_type, StoryType::Audio);
        assert_eq!(updated.category, "childhood");
    }

    #[test]
    fn prompts_are_not_empty() {
        assert!(STORY_PROMPTS.len() >= 10);
        assert!(STORY_PROMPTS.iter().all(|p| p.ends_with('?') || p.ends_with('.')));
    }
}
