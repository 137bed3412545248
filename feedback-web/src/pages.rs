//! HTML page rendering.

use anyhow::{Context, Result};
use feedback::core::types::{RATING_MAX, RATING_MIN};
use feedback::form::{FormSnapshot, Notification};
use feedback::listing::ListingView;
use minijinja::{Environment, context};

const BASE_TEMPLATE: &str = include_str!("templates/base.html");
const FORM_TEMPLATE: &str = include_str!("templates/form.html");
const SUCCESS_TEMPLATE: &str = include_str!("templates/success.html");
const LISTING_TEMPLATE: &str = include_str!("templates/listing.html");

/// Compiled page templates.
///
/// Template names end in `.html`, which turns on HTML auto-escaping.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("base.html", BASE_TEMPLATE)
            .context("load base template")?;
        env.add_template("form.html", FORM_TEMPLATE)
            .context("load form template")?;
        env.add_template("success.html", SUCCESS_TEMPLATE)
            .context("load success template")?;
        env.add_template("listing.html", LISTING_TEMPLATE)
            .context("load listing template")?;
        Ok(Self { env })
    }

    /// The submission form with current values, inline errors and an
    /// optional toast.
    pub fn form(&self, snapshot: &FormSnapshot, notice: Option<&Notification>) -> Result<String> {
        let template = self.env.get_template("form.html")?;
        let ratings: Vec<u8> = (RATING_MIN..=RATING_MAX).collect();
        let rendered = template.render(context! {
            values => &snapshot.values,
            errors => &snapshot.errors,
            state => snapshot.state,
            ratings => ratings,
            notice => notice,
        })?;
        Ok(rendered)
    }

    /// Thank-you card that returns to the empty form after `display_secs`.
    pub fn success(&self, display_secs: u64, notice: Option<&Notification>) -> Result<String> {
        let template = self.env.get_template("success.html")?;
        let rendered = template.render(context! {
            display_secs => display_secs,
            notice => notice,
        })?;
        Ok(rendered)
    }

    pub fn listing(&self, view: &ListingView) -> Result<String> {
        let template = self.env.get_template("listing.html")?;
        let rendered = template.render(context! {
            summary => view.summary(),
            rows => view.rows(),
        })?;
        Ok(rendered)
    }
}
