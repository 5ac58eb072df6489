//! Stateless building blocks. Each variant maps to a fixed class set; the
//! lookup tables below are the only place those class names live.

use serde::{Deserialize, Serialize};
use tera::escape_html;

pub const CARD_CLASSES: &str = "rounded-lg border bg-card text-card-foreground shadow-sm";

/// Joins class fragments, skipping empty ones.
pub fn class_names(parts: &[&str]) -> String {
  parts.iter().map(|p| p.trim()).filter(|p| !p.is_empty()).collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Size {
  Sm,
  #[default]
  Md,
  Lg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonVariant {
  #[default]
  Primary,
  Secondary,
  Outline,
  Ghost,
}

impl ButtonVariant {
  pub fn classes(self) -> &'static str {
    match self {
      ButtonVariant::Primary => "bg-primary text-primary-foreground hover:bg-primary/90",
      ButtonVariant::Secondary => "bg-secondary text-secondary-foreground hover:bg-secondary/80",
      ButtonVariant::Outline => "border border-input bg-background hover:bg-accent",
      ButtonVariant::Ghost => "hover:bg-accent hover:text-accent-foreground",
    }
  }
}

impl Size {
  fn button_classes(self) -> &'static str {
    match self {
      Size::Sm => "h-9 px-3 text-sm",
      Size::Md => "h-10 px-4 py-2",
      Size::Lg => "h-11 px-8 text-lg",
    }
  }

  fn spinner_classes(self) -> &'static str {
    match self {
      Size::Sm => "h-4 w-4 border-2",
      Size::Md => "h-8 w-8 border-4",
      Size::Lg => "h-12 w-12 border-4",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonType {
  #[default]
  Button,
  Submit,
}

#[derive(Debug, Clone, Default)]
pub struct Button<'a> {
  pub label: &'a str,
  pub variant: ButtonVariant,
  pub size: Size,
  pub kind: ButtonType,
  pub disabled: bool,
}

impl Button<'_> {
  pub fn render(&self) -> String {
    let kind = match self.kind {
      ButtonType::Button => "button",
      ButtonType::Submit => "submit",
    };
    let class = class_names(&[
      "inline-flex items-center justify-center rounded-md font-medium",
      self.variant.classes(),
      self.size.button_classes(),
      if self.disabled { "opacity-50 pointer-events-none" } else { "" },
    ]);

    format!(
      r#"<button type="{}" class="{}"{}>{}</button>"#,
      kind,
      class,
      if self.disabled { " disabled" } else { "" },
      escape_html(self.label)
    )
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
  #[default]
  Default,
  Secondary,
  Outline,
  Sale,
}

impl BadgeVariant {
  pub fn classes(self) -> &'static str {
    match self {
      BadgeVariant::Default => "border-transparent bg-primary text-primary-foreground",
      BadgeVariant::Secondary => "border-transparent bg-secondary text-secondary-foreground",
      BadgeVariant::Outline => "text-foreground",
      BadgeVariant::Sale => "border-transparent bg-red-600 text-white",
    }
  }
}

#[derive(Debug, Clone)]
pub struct Badge<'a> {
  pub label: &'a str,
  pub variant: BadgeVariant,
}

impl Badge<'_> {
  pub fn render(&self) -> String {
    let class = class_names(&[
      "inline-flex items-center rounded-full border px-2.5 py-0.5 text-xs font-semibold",
      self.variant.classes(),
    ]);
    format!(r#"<span class="{}">{}</span>"#, class, escape_html(self.label))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
  #[default]
  Text,
  Search,
  Number,
  Email,
}

#[derive(Debug, Clone, Default)]
pub struct Input<'a> {
  pub name: &'a str,
  pub kind: InputType,
  pub placeholder: Option<&'a str>,
  pub value: Option<&'a str>,
}

impl Input<'_> {
  pub fn render(&self) -> String {
    let kind = match self.kind {
      InputType::Text => "text",
      InputType::Search => "search",
      InputType::Number => "number",
      InputType::Email => "email",
    };

    let mut html = format!(
      r#"<input type="{}" name="{}" class="flex h-10 w-full rounded-md border border-input bg-background px-3 py-2 text-sm""#,
      kind,
      escape_html(self.name)
    );
    if let Some(placeholder) = self.placeholder {
      html.push_str(&format!(r#" placeholder="{}""#, escape_html(placeholder)));
    }
    if let Some(value) = self.value {
      html.push_str(&format!(r#" value="{}""#, escape_html(value)));
    }
    html.push('>');
    html
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Spinner {
  pub size: Size,
}

impl Spinner {
  pub fn render(&self) -> String {
    let class = class_names(&[
      "animate-spin rounded-full border-primary border-t-transparent",
      self.size.spinner_classes(),
    ]);
    format!(r#"<div class="{}" aria-hidden="true"></div>"#, class)
  }
}

#[derive(Debug, Clone)]
pub struct Logo<'a> {
  pub site_name: &'a str,
  pub href: &'a str,
}

impl Logo<'_> {
  pub fn render(&self) -> String {
    format!(
      r#"<a href="{}" class="site-logo text-xl font-bold tracking-tight">{}</a>"#,
      escape_html(self.href),
      escape_html(self.site_name)
    )
  }
}
