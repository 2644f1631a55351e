use crate::config::save::save_settings;
use crate::config::{Config, Language};
use crate::menu::handlers::{
    run_date_copier, run_motion_player, run_motion_scanner, run_name_reverter, run_video_redater,
    run_video_renamer,
};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_date_copier"),
        t!("main_menu.opt_renamer"),
        t!("main_menu.opt_reverter"),
        t!("main_menu.opt_redater"),
        t!("main_menu.opt_motion_scanner"),
        t!("main_menu.opt_motion_player"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => run_date_copier(term, shutdown_signal)?,
        Some(1) => run_video_renamer(term, shutdown_signal)?,
        Some(2) => run_name_reverter(term, shutdown_signal)?,
        Some(3) => run_video_redater(term, shutdown_signal)?,
        Some(4) => run_motion_scanner(term, shutdown_signal)?,
        Some(5) => run_motion_player(term, shutdown_signal)?,
        Some(6) => {
            // 其他功能可能已更新最近路徑，先重新讀取避免覆蓋
            *config = Config::new()?;
            show_settings_menu(term, config)?;
        }
        _ => return Ok(false), // ESC 或離開
    }

    Ok(true)
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_language"),
            t!("settings.opt_motion_threshold"),
            t!("settings.opt_exiftool"),
            t!("settings.opt_overwrite_original"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_language_menu(term, config)?,
            Some(1) => show_motion_threshold_menu(term, config)?,
            Some(2) => show_exiftool_menu(term, config)?,
            Some(3) => show_overwrite_original_menu(term, config)?,
            _ => break,
        }
    }

    Ok(())
}

fn saved(value: impl std::fmt::Display) {
    println!("\n{} {}", style(t!("settings.saved")).green(), value);
    std::thread::sleep(std::time::Duration::from_secs(1));
}

/// 移動區塊面積下限
fn show_motion_threshold_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.motion.title")).cyan().bold());
    println!(
        "\n{} {}\n",
        style(t!("settings.current")).dim(),
        config.settings.motion.area_threshold
    );

    let threshold: f64 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.motion.prompt"))
        .default(config.settings.motion.area_threshold)
        .validate_with(|value: &f64| {
            if value.is_finite() && *value >= 0.0 {
                Ok(())
            } else {
                Err(t!("settings.motion.invalid").to_string())
            }
        })
        .interact_text_on(term)?;

    if (threshold - config.settings.motion.area_threshold).abs() > f64::EPSILON {
        config.settings.motion.area_threshold = threshold;
        save_settings(&config.settings)?;
        saved(threshold);
    }

    Ok(())
}

fn show_exiftool_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.exiftool.title")).cyan().bold());
    println!(
        "\n{} {}\n",
        style(t!("settings.current")).dim(),
        config.settings.tools.exiftool
    );

    let path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.exiftool.prompt"))
        .default(config.settings.tools.exiftool.clone())
        .interact_text_on(term)?;
    let path = path.trim().to_string();

    if !path.is_empty() && path != config.settings.tools.exiftool {
        config.settings.tools.exiftool.clone_from(&path);
        save_settings(&config.settings)?;
        saved(path);
    }

    Ok(())
}

fn show_overwrite_original_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    let overwrite = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.overwrite_original.prompt"))
        .default(config.settings.tools.overwrite_original)
        .interact_on(term)?;

    if overwrite != config.settings.tools.overwrite_original {
        config.settings.tools.overwrite_original = overwrite;
        save_settings(&config.settings)?;
        saved(overwrite);
    }

    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhTw];
    let items: Vec<String> = languages.iter().map(Language::to_string).collect();

    let default_index = languages
        .iter()
        .position(|&l| l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language.prompt"))
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    // ESC pressed - return without saving
    let Some(selection) = selection else {
        return Ok(());
    };

    let selected_lang = languages[selection];

    if selected_lang != config.settings.language {
        config.settings.language = selected_lang;
        rust_i18n::set_locale(selected_lang.as_str());
        save_settings(&config.settings)?;
        saved(selected_lang);
    }

    Ok(())
}
