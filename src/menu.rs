//! Tray menu model. The platform renders it; the id of the chosen item
//! comes back as the return value of a `TPM_RETURNCMD` popup.

use crate::keys::VirtualKey;
use std::time::Duration;

const ID_CHANGE_HOTKEY: u32 = 100;
const ID_TOGGLE_SOUND: u32 = 101;
const ID_RESET_POSITION: u32 = 102;
const ID_EXIT: u32 = 103;
const ID_PRESET_BASE: u32 = 200;
const MAX_PRESETS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    ChangeHotkey,
    /// Index into the configured duration presets.
    SelectPreset(usize),
    ToggleSound,
    ResetPosition,
    Exit,
}

impl MenuCommand {
    pub fn id(self) -> u32 {
        match self {
            MenuCommand::ChangeHotkey => ID_CHANGE_HOTKEY,
            MenuCommand::SelectPreset(index) => ID_PRESET_BASE + index as u32,
            MenuCommand::ToggleSound => ID_TOGGLE_SOUND,
            MenuCommand::ResetPosition => ID_RESET_POSITION,
            MenuCommand::Exit => ID_EXIT,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            ID_CHANGE_HOTKEY => Some(MenuCommand::ChangeHotkey),
            ID_TOGGLE_SOUND => Some(MenuCommand::ToggleSound),
            ID_RESET_POSITION => Some(MenuCommand::ResetPosition),
            ID_EXIT => Some(MenuCommand::Exit),
            id if (ID_PRESET_BASE..ID_PRESET_BASE + MAX_PRESETS).contains(&id) => {
                Some(MenuCommand::SelectPreset((id - ID_PRESET_BASE) as usize))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub command: MenuCommand,
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator,
}

/// Snapshot of controller state the menu is built from.
#[derive(Debug, Clone, Copy)]
pub struct MenuState<'a> {
    pub bound_key: Option<VirtualKey>,
    pub listening: bool,
    pub presets: &'a [Duration],
    pub current_duration: Duration,
    pub sound_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuModel {
    pub entries: Vec<MenuEntry>,
}

impl MenuModel {
    pub fn build(state: MenuState<'_>) -> Self {
        let hotkey_label = if state.listening {
            "Hotkey: awaiting input".to_string()
        } else {
            match state.bound_key {
                Some(key) => format!("Hotkey: {key} (change)"),
                None => "Hotkey: none (change)".to_string(),
            }
        };

        let mut entries = vec![MenuEntry::Item(MenuItem {
            command: MenuCommand::ChangeHotkey,
            label: hotkey_label,
            checked: false,
        })];

        entries.extend(
            state
                .presets
                .iter()
                .take(MAX_PRESETS as usize)
                .enumerate()
                .map(|(index, preset)| {
                    MenuEntry::Item(MenuItem {
                        command: MenuCommand::SelectPreset(index),
                        label: format!("{} seconds", preset.as_secs()),
                        checked: *preset == state.current_duration,
                    })
                }),
        );

        entries.push(MenuEntry::Item(MenuItem {
            command: MenuCommand::ToggleSound,
            label: "Sound cues".to_string(),
            checked: state.sound_enabled,
        }));
        entries.push(MenuEntry::Item(MenuItem {
            command: MenuCommand::ResetPosition,
            label: "Reset position".to_string(),
            checked: false,
        }));
        entries.push(MenuEntry::Separator);
        entries.push(MenuEntry::Item(MenuItem {
            command: MenuCommand::Exit,
            label: "Exit".to_string(),
            checked: false,
        }));

        Self { entries }
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Item(item) => Some(item),
            MenuEntry::Separator => None,
        })
    }

    pub fn item(&self, command: MenuCommand) -> Option<&MenuItem> {
        self.items().find(|item| item.command == command)
    }
}
