// main.rs
// Entry point for the modloader terminal front-end

use std::process;

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use serde_json::{Value, json};

use modloader::config;
use modloader::licenses::{self, License};
use modloader::{
    ColorToken, DebugLogger, Error, Panel, ProfileStore, PromptStyle, Section, Settings, Style,
    TextStyle,
};

const MAIN_MENU: &[(&str, &str)] = &[("1", "FastFlags"), ("2", "Licenses"), ("0", "Exit")];

const PROFILE_HELP: &[&str] = &[
    "add <name> | remove <name> | rename <old> <new>",
    "enable <name> | disable <name> | studio <name> on|off",
    "set <name> <flag> <value> | unset <name> <flag> | back",
];

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "[ERROR]".red(), format!("{:#}", e).red());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let settings = config::load_settings().context("Failed to load settings")?;
    let logger = settings.logger();
    let store = ProfileStore::new(settings.fastflags_path()?).with_logger(logger.clone());

    logger.log_step(
        "startup",
        Some(&json!({
            "gutter": settings.gutter,
            "fastflags": store.path().display().to_string(),
        })),
    )?;

    let result = main_menu(&settings, &store, &logger);
    if let Err(e) = &result {
        let _ = logger.log_error(e);
    }
    result
}

fn choice_style() -> PromptStyle {
    PromptStyle::default()
        .text(ColorToken::Accent)
        .input(ColorToken::Text)
        .input_style(Style::Bold)
}

/// Prompts once; `None` when the user closed input (Ctrl-D) or hit Ctrl-C.
fn ask(panel: &mut Panel, text: &str) -> Result<Option<String>> {
    match panel.prompt(text, &choice_style()) {
        Ok(line) => Ok(Some(line)),
        Err(Error::InputClosed) | Err(Error::Interrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn add_status(panel: &mut Panel, status: &Option<(String, ColorToken)>) -> Result<()> {
    if let Some((message, color)) = status {
        panel.add_fill_divider(' ')?;
        panel.add_line(message.as_str(), TextStyle::new(*color))?;
    }
    Ok(())
}

fn main_menu(settings: &Settings, store: &ProfileStore, logger: &DebugLogger) -> Result<()> {
    let mut panel = Panel::console(
        settings,
        Section::new("Main Menu")
            .with_description("Choose an option below")
            .style(Style::Bold),
    )?;
    let mut status = None;

    loop {
        panel.reset()?;
        for (key, label) in MAIN_MENU {
            panel.add_line(format!("[{}] {}", key, label), TextStyle::new(ColorToken::Text))?;
        }
        add_status(&mut panel, &status)?;
        panel.add_divider()?;

        let Some(choice) = ask(&mut panel, "Choice: ")? else {
            return Ok(());
        };
        status = None;
        match choice.trim() {
            "1" => fastflags_screen(settings, store, logger)?,
            "2" => licenses_screen(settings)?,
            "0" | "exit" | "quit" => return Ok(()),
            other => status = Some((format!("Invalid choice: {}", other), ColorToken::Error)),
        }
    }
}

#[derive(Debug, PartialEq)]
enum ProfileCommand {
    Add(String),
    Remove(String),
    Rename(String, String),
    Enable(String, bool),
    Studio(String, bool),
    Set(String, String, String),
    Unset(String, String),
    Back,
}

fn parse_profile_command(line: &str) -> std::result::Result<ProfileCommand, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let usage = |form: &str| format!("Usage: {}", form);

    match words.as_slice() {
        ["back"] | ["exit"] | ["0"] => Ok(ProfileCommand::Back),
        ["add", name] => Ok(ProfileCommand::Add(name.to_string())),
        ["remove", name] => Ok(ProfileCommand::Remove(name.to_string())),
        ["rename", old, new] => Ok(ProfileCommand::Rename(old.to_string(), new.to_string())),
        ["enable", name] => Ok(ProfileCommand::Enable(name.to_string(), true)),
        ["disable", name] => Ok(ProfileCommand::Enable(name.to_string(), false)),
        ["studio", name, "on"] => Ok(ProfileCommand::Studio(name.to_string(), true)),
        ["studio", name, "off"] => Ok(ProfileCommand::Studio(name.to_string(), false)),
        ["set", name, flag, value @ ..] if !value.is_empty() => Ok(ProfileCommand::Set(
            name.to_string(),
            flag.to_string(),
            value.join(" "),
        )),
        ["unset", name, flag] => Ok(ProfileCommand::Unset(name.to_string(), flag.to_string())),
        [] => Err("Type a command, or `back` to return".to_string()),
        ["add", ..] => Err(usage("add <name>")),
        ["remove", ..] => Err(usage("remove <name>")),
        ["rename", ..] => Err(usage("rename <old> <new>")),
        ["enable", ..] | ["disable", ..] => Err(usage("enable|disable <name>")),
        ["studio", ..] => Err(usage("studio <name> on|off")),
        ["set", ..] => Err(usage("set <name> <flag> <value>")),
        ["unset", ..] => Err(usage("unset <name> <flag>")),
        [other, ..] => Err(format!("Unknown command: {}", other)),
    }
}

/// Applies a command and returns the confirmation to show.
fn apply_profile_command(store: &ProfileStore, command: ProfileCommand) -> modloader::Result<String> {
    Ok(match command {
        ProfileCommand::Add(name) => {
            store.add(&name)?;
            format!("Added profile {}", name)
        }
        ProfileCommand::Remove(name) => {
            store.remove(&name)?;
            format!("Removed profile {}", name)
        }
        ProfileCommand::Rename(old, new) => {
            store.rename(&old, &new)?;
            format!("Renamed {} to {}", old, new)
        }
        ProfileCommand::Enable(name, enabled) => {
            store.set_enabled(&name, enabled)?;
            format!("{} {}", if enabled { "Enabled" } else { "Disabled" }, name)
        }
        ProfileCommand::Studio(name, enabled) => {
            store.set_enabled_studio(&name, enabled)?;
            format!("Studio {} for {}", if enabled { "enabled" } else { "disabled" }, name)
        }
        ProfileCommand::Set(name, flag, value) => {
            store.set_flag(&name, &flag, Value::String(value))?;
            format!("Set {} in {}", flag, name)
        }
        ProfileCommand::Unset(name, flag) => {
            store.remove_flag(&name, &flag)?;
            format!("Removed {} from {}", flag, name)
        }
        ProfileCommand::Back => String::new(),
    })
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn fastflags_screen(settings: &Settings, store: &ProfileStore, logger: &DebugLogger) -> Result<()> {
    let mut panel = Panel::console(
        settings,
        Section::new("FastFlags").with_description("Manage FastFlag profiles"),
    )?;
    let mut status: Option<(String, ColorToken)> = None;

    loop {
        panel.reset()?;

        let profiles = store.read()?;
        if profiles.is_empty() {
            panel.add_line("No profiles yet", TextStyle::new(ColorToken::Muted).with_style(Style::Italic))?;
        }
        for profile in &profiles {
            let color = if profile.enabled { ColorToken::Success } else { ColorToken::Text };
            panel.add_line(
                format!(
                    "{}  [player: {}, studio: {}, {} flag(s)]",
                    profile.name,
                    on_off(profile.enabled),
                    on_off(profile.enabled_studio),
                    profile.data.len()
                ),
                TextStyle::new(color),
            )?;
        }
        let active = store.list_active()?.len();
        panel.add_fill_divider(' ')?;
        panel.add_line(format!("Active flags: {}", active), TextStyle::new(ColorToken::Accent))?;
        panel.add_divider()?;
        for help in PROFILE_HELP {
            panel.add_line(*help, TextStyle::new(ColorToken::Muted))?;
        }
        add_status(&mut panel, &status)?;
        panel.add_divider()?;

        let Some(line) = ask(&mut panel, "Command: ")? else {
            return Ok(());
        };
        status = match parse_profile_command(&line) {
            Ok(ProfileCommand::Back) => return Ok(()),
            Ok(command) => match apply_profile_command(store, command) {
                Ok(message) => Some((message, ColorToken::Success)),
                Err(e) => {
                    let message = e.to_string();
                    let _ = logger.log_error(&anyhow::Error::new(e).context("FastFlag command failed"));
                    Some((message, ColorToken::Error))
                }
            },
            Err(usage) => Some((usage, ColorToken::Warning)),
        };
    }
}

fn licenses_screen(settings: &Settings) -> Result<()> {
    let mut panel = Panel::console(settings, Section::new("Licenses"))?;
    let mut status = None;

    loop {
        panel.reset()?;
        panel.change_section_description(None)?;
        for (index, license) in licenses::all().iter().enumerate() {
            panel.add_line(format!("[{}] {}", index + 1, license.name), TextStyle::new(ColorToken::Text))?;
        }
        panel.add_line("[0] Back", TextStyle::new(ColorToken::Text))?;
        add_status(&mut panel, &status)?;
        panel.add_divider()?;

        let Some(choice) = ask(&mut panel, "Choice: ")? else {
            return Ok(());
        };
        status = None;
        match choice.trim().parse::<usize>() {
            Ok(0) => return Ok(()),
            Ok(n) if n <= licenses::all().len() => {
                if !show_license(&mut panel, &licenses::all()[n - 1])? {
                    return Ok(());
                }
            }
            _ => status = Some((format!("Invalid choice: {}", choice.trim()), ColorToken::Error)),
        }
    }
}

/// Shows one license; `false` when input was closed while it was open.
fn show_license(panel: &mut Panel, license: &License) -> Result<bool> {
    panel.reset()?;
    let description = format!("{} by {}", license.name, license.owner);
    panel.change_section_description(Some(description.as_str()))?;
    panel.add_line(license.url, TextStyle::new(ColorToken::Accent).with_style(Style::Underline))?;
    panel.add_fill_divider(' ')?;
    for line in license.text_lines() {
        panel.add_line(line, TextStyle::new(ColorToken::Text))?;
    }
    panel.add_divider()?;

    Ok(ask(panel, "Press Enter to return ")?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile_commands() {
        assert_eq!(parse_profile_command("add Fps"), Ok(ProfileCommand::Add("Fps".into())));
        assert_eq!(
            parse_profile_command("  rename  Fps   Unlock "),
            Ok(ProfileCommand::Rename("Fps".into(), "Unlock".into()))
        );
        assert_eq!(parse_profile_command("disable Fps"), Ok(ProfileCommand::Enable("Fps".into(), false)));
        assert_eq!(parse_profile_command("studio Fps on"), Ok(ProfileCommand::Studio("Fps".into(), true)));
        assert_eq!(
            parse_profile_command("set Fps DFIntTaskSchedulerTargetFps 240"),
            Ok(ProfileCommand::Set("Fps".into(), "DFIntTaskSchedulerTargetFps".into(), "240".into()))
        );
        assert_eq!(parse_profile_command("back"), Ok(ProfileCommand::Back));
    }

    #[test]
    fn test_parse_profile_command_errors() {
        assert_eq!(parse_profile_command("add"), Err("Usage: add <name>".to_string()));
        assert_eq!(parse_profile_command("studio Fps maybe"), Err("Usage: studio <name> on|off".to_string()));
        assert_eq!(parse_profile_command("set Fps Flag"), Err("Usage: set <name> <flag> <value>".to_string()));
        assert_eq!(parse_profile_command("launch"), Err("Unknown command: launch".to_string()));
        assert!(parse_profile_command("   ").is_err());
    }

    #[test]
    fn test_apply_profile_commands() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("fastflags.json"));

        apply_profile_command(&store, ProfileCommand::Add("Fps".into())).unwrap();
        apply_profile_command(&store, ProfileCommand::Enable("Fps".into(), true)).unwrap();
        apply_profile_command(
            &store,
            ProfileCommand::Set("Fps".into(), "DFIntTaskSchedulerTargetFps".into(), "240".into()),
        )
        .unwrap();

        let active = store.list_active().unwrap();
        assert_eq!(active.get("DFIntTaskSchedulerTargetFps"), Some(&json!("240")));

        let err = apply_profile_command(&store, ProfileCommand::Enable("Nope".into(), true)).unwrap_err();
        assert_eq!(err.to_string(), "FastFlag profile not found: Nope");
    }
}
