use owo_colors::OwoColorize;

use pdfsift_core::{ExtractError, Method};

/// Whether to use colored status output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Status lines go to stderr so stdout stays clean for the rendered result.
pub fn print_processing(file_name: &str, method: Method, color: ColorMode) {
    if color.enabled() {
        eprintln!(
            "{}",
            format!("PDF işleniyor... ({method}): {file_name}").dimmed()
        );
    } else {
        eprintln!("PDF işleniyor... ({method}): {file_name}");
    }
}

pub fn print_success(color: ColorMode) {
    if color.enabled() {
        eprintln!("{}", "PDF başarıyla işlendi!".green());
    } else {
        eprintln!("PDF başarıyla işlendi!");
    }
}

pub fn print_error(err: &ExtractError, color: ColorMode) {
    if color.enabled() {
        eprintln!("{} {}", "Bir hata oluştu:".red(), err);
    } else {
        eprintln!("Bir hata oluştu: {err}");
    }
    eprintln!("Farklı bir yöntem veya başka bir PDF dosyası deneyin.");
}

pub fn print_tools(tools: &[(String, bool)], color: ColorMode) {
    for (tool, available) in tools {
        if color.enabled() {
            if *available {
                println!("{}: {}", tool, "bulundu".green());
            } else {
                println!("{}: {}", tool, "bulunamadı".red());
            }
        } else {
            println!(
                "{}: {}",
                tool,
                if *available { "bulundu" } else { "bulunamadı" }
            );
        }
    }
}
