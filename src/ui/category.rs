//! Cosmetic classification of executables by name, for the list's tag column.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Browser,
    Chat,
    Call,
    Dev,
    Editor,
    Media,
    Game,
    Office,
    Mail,
    Cloud,
    Files,
    Shell,
    Service,
    App,
    Other,
}

impl Category {
    pub fn tag(self) -> &'static str {
        match self {
            Category::Browser => "web",
            Category::Chat => "chat",
            Category::Call => "call",
            Category::Dev => "dev",
            Category::Editor => "edit",
            Category::Media => "media",
            Category::Game => "game",
            Category::Office => "office",
            Category::Mail => "mail",
            Category::Cloud => "cloud",
            Category::Files => "files",
            Category::Shell => "shell",
            Category::Service => "svc",
            Category::App => "app",
            Category::Other => "",
        }
    }
}

/// First matching substring wins, so more specific entries come first.
const TABLE: &[(&str, Category)] = &[
    ("chrome", Category::Browser),
    ("firefox", Category::Browser),
    ("msedge", Category::Browser),
    ("edge", Category::Browser),
    ("opera", Category::Browser),
    ("brave", Category::Browser),
    ("vivaldi", Category::Browser),
    ("safari", Category::Browser),
    ("discord", Category::Chat),
    ("teams", Category::Chat),
    ("slack", Category::Chat),
    ("whatsapp", Category::Chat),
    ("telegram", Category::Chat),
    ("zoom", Category::Call),
    ("skype", Category::Call),
    ("notepad++", Category::Editor),
    ("sublime_text", Category::Editor),
    ("code", Category::Dev),
    ("studio", Category::Dev),
    ("git", Category::Dev),
    ("node", Category::Dev),
    ("python", Category::Dev),
    ("cargo", Category::Dev),
    ("rust-analyzer", Category::Dev),
    ("spotify", Category::Media),
    ("vlc", Category::Media),
    ("photoshop", Category::Media),
    ("media", Category::Media),
    ("steam", Category::Game),
    ("game", Category::Game),
    ("winword", Category::Office),
    ("word", Category::Office),
    ("excel", Category::Office),
    ("powerpnt", Category::Office),
    ("powerpoint", Category::Office),
    ("notion", Category::Office),
    ("outlook", Category::Mail),
    ("thunderbird", Category::Mail),
    ("notepad", Category::Editor),
    ("obsidian", Category::Editor),
    ("onedrive", Category::Cloud),
    ("dropbox", Category::Cloud),
    ("explorer", Category::Files),
    ("finder", Category::Files),
    ("powershell", Category::Shell),
    ("pwsh", Category::Shell),
    ("cmd", Category::Shell),
    ("terminal", Category::Shell),
    ("bash", Category::Shell),
    ("zsh", Category::Shell),
    ("service", Category::Service),
    ("svc", Category::Service),
    ("systemd", Category::Service),
    ("daemon", Category::Service),
];

pub fn categorize(name: &str) -> Category {
    let name = name.to_lowercase();
    TABLE
        .iter()
        .find(|(needle, _)| name.contains(needle))
        .map(|&(_, category)| category)
        .unwrap_or_else(|| {
            if name.ends_with(".exe") {
                Category::App
            } else {
                Category::Other
            }
        })
}
