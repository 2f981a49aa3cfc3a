//! Fixed demonstration dataset used when no stored collections exist yet.

use chrono::Utc;

use crate::{Folder, Note, Tag, TagColor};

/// Builds the demonstration collections: three folders, five tags, and
/// five notes. Ids are fixed literals so the dataset is stable across
/// seedings; timestamps are taken at generation time.
pub fn sample_collections() -> (Vec<Note>, Vec<Folder>, Vec<Tag>) {
    let folders = vec![
        Folder {
            id: "folder-1".to_string(),
            name: "Getting Started".to_string(),
            parent_id: None,
        },
        Folder {
            id: "folder-2".to_string(),
            name: "Projects".to_string(),
            parent_id: None,
        },
        Folder {
            id: "folder-3".to_string(),
            name: "Personal".to_string(),
            parent_id: None,
        },
    ];

    let tags = vec![
        Tag {
            id: "tag-1".to_string(),
            name: "important".to_string(),
            color: TagColor::Red,
        },
        Tag {
            id: "tag-2".to_string(),
            name: "work".to_string(),
            color: TagColor::Blue,
        },
        Tag {
            id: "tag-3".to_string(),
            name: "idea".to_string(),
            color: TagColor::Purple,
        },
        Tag {
            id: "tag-4".to_string(),
            name: "todo".to_string(),
            color: TagColor::Yellow,
        },
        Tag {
            id: "tag-5".to_string(),
            name: "reference".to_string(),
            color: TagColor::Green,
        },
    ];

    let now = Utc::now();
    let note = |id: &str, title: &str, content: &str, folder: &str, tags: &[&str]| Note {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        folder_id: Some(folder.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: now,
        updated_at: now,
    };

    let notes = vec![
        note("note-1", "Welcome to InkWell", WELCOME, "folder-1", &["tag-5"]),
        note("note-2", "Project Ideas", PROJECT_IDEAS, "folder-2", &["tag-3"]),
        note(
            "note-3",
            "Weekly Tasks",
            WEEKLY_TASKS,
            "folder-2",
            &["tag-2", "tag-4"],
        ),
        note("note-4", "Reading List", READING_LIST, "folder-3", &["tag-5"]),
        note(
            "note-5",
            "Vacation Planning",
            VACATION_PLANNING,
            "folder-3",
            &["tag-3", "tag-4"],
        ),
    ];

    (notes, folders, tags)
}

const WELCOME: &str = r##"# Welcome to InkWell!

InkWell is a markdown-based note-taking app with powerful features to help you organize your thoughts.

## Features

- **Markdown Support**: Write using markdown syntax with live preview
- **Folders**: Organize your notes in folders
- **Tags**: Categorize notes with colorful tags
- **Search**: Quickly find any note
- **Syntax Highlighting**: Code blocks are beautifully highlighted

## Markdown Examples

### Text Formatting

You can write in **bold**, *italic*, or ~~strikethrough~~.

### Lists

Unordered list:
- Item 1
- Item 2
- Item 3

Ordered list:
1. First item
2. Second item
3. Third item

### Code

Inline code: `const greeting = "Hello World";`

Code block with syntax highlighting:
```javascript
function greet(name) {
  return `Hello, ${name}!`;
}

console.log(greet("User"));
```

### Blockquotes

> This is a blockquote
> It can span multiple lines

### Links and Images

[Link to Google](https://google.com)

### Tables

| Header 1 | Header 2 |
| -------- | -------- |
| Cell 1   | Cell 2   |
| Cell 3   | Cell 4   |

Enjoy using InkWell for all your note-taking needs!"##;

const PROJECT_IDEAS: &str = r##"# Project Ideas

## Web Development
- Create a personal portfolio website
- Build a weather app with React
- Develop a recipe finder app

## Mobile Apps
- Habit tracker with reminders
- Language learning flashcards
- Minimalist to-do list

## Machine Learning
- Image classification for plant species
- Sentiment analysis for product reviews
- Music recommendation engine

## Game Development
- 2D platformer with procedural level generation
- Text-based adventure game
- Puzzle game with increasing difficulty

Need to prioritize these and start working on them soon!"##;

const WEEKLY_TASKS: &str = r##"# Weekly Tasks

## Monday
- [x] Team meeting (9:00 AM)
- [x] Review project requirements
- [ ] Send follow-up emails

## Tuesday
- [ ] Work on database design
- [ ] Update documentation
- [ ] Virtual coffee chat with mentor

## Wednesday
- [ ] Implement new API endpoints
- [ ] Code review for PR #42
- [ ] Debugging session

## Thursday
- [ ] UI improvements for dashboard
- [ ] Write tests for new features
- [ ] Project planning for next sprint

## Friday
- [ ] Weekly summary report
- [ ] Team retrospective
- [ ] Plan for next week

**Remember:** Update task list daily and prioritize based on deadline."##;

const READING_LIST: &str = r##"# Reading List

## Currently Reading
- "Atomic Habits" by James Clear
- "The Pragmatic Programmer" by Andrew Hunt and David Thomas

## Next Up
- "Designing Data-Intensive Applications" by Martin Kleppmann
- "Deep Work" by Cal Newport
- "The Psychology of Money" by Morgan Housel

## Recommended by Friends
- "Sapiens" by Yuval Noah Harari
- "The Almanack of Naval Ravikant"
- "Thinking, Fast and Slow" by Daniel Kahneman

## Technical Books to Consider
- "Clean Code" by Robert C. Martin
- "Refactoring" by Martin Fowler
- "Domain-Driven Design" by Eric Evans

*Remember to check the local library or e-book availability before purchasing!*"##;

const VACATION_PLANNING: &str = r##"# Summer Vacation Planning

## Destination Ideas
- Barcelona, Spain
- Kyoto, Japan
- Vancouver, Canada
- Santorini, Greece

## Budget Breakdown
| Category | Estimated Cost |
| -------- | -------------- |
| Flights  | $800 - $1200   |
| Lodging  | $1000 - $1500  |
| Food     | $500 - $700    |
| Activities | $400 - $600  |
| Misc     | $300           |
| **Total**| $3000 - $4300  |

## Pre-Trip Checklist
- [ ] Research visa requirements
- [ ] Book flights
- [ ] Reserve accommodations
- [ ] Purchase travel insurance
- [ ] Notify bank of travel plans
- [ ] Set up mail hold
- [ ] Create packing list

## Must-See Attractions
Depends on final destination, but should include:
- Local cultural sites
- Natural landscapes
- Food experiences
- Off-the-beaten-path neighborhoods

Need to make final decision by end of month to get the best deals!"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_data_is_internally_consistent() {
        let (notes, folders, tags) = sample_collections();

        assert_eq!(notes.len(), 5);
        assert_eq!(folders.len(), 3);
        assert_eq!(tags.len(), 5);

        for note in &notes {
            if let Some(folder_id) = &note.folder_id {
                assert!(folders.iter().any(|f| &f.id == folder_id));
            }
            for tag_id in &note.tags {
                assert!(tags.iter().any(|t| &t.id == tag_id));
            }
        }
    }
}
