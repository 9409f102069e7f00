//! Email bodies rendered with handlebars
//!
//! Templates are compiled once in strict mode; a missing variable is a
//! render error. Links are inserted unescaped and must be built by the
//! server, never taken from user input.

use handlebars::Handlebars;
use serde_json::json;

use crate::error::NotifyError;

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="id">
<body style="font-family: Arial, sans-serif; color: #1f2937;">
  <h2 style="color: #1d4ed8;">SILAPOR</h2>
  {{> body}}
  <hr>
  <p style="font-size: 12px; color: #6b7280;">Email ini dikirim otomatis oleh SILAPOR, sistem laporan barang hilang dan temuan kampus.</p>
</body>
</html>"#;

const VERIFICATION: &str = r#"{{#> layout}}{{#*inline "body"}}
<p>Halo {{name}},</p>
<p>Terima kasih telah mendaftar. Klik tautan berikut untuk memverifikasi email Anda:</p>
<p><a href="{{{link}}}">Verifikasi Email</a></p>
{{/inline}}{{/layout}}"#;

const PASSWORD_RESET: &str = r#"{{#> layout}}{{#*inline "body"}}
<p>Halo {{name}},</p>
<p>Kami menerima permintaan untuk mengatur ulang password Anda. Tautan berlaku selama {{ttl_minutes}} menit:</p>
<p><a href="{{{link}}}">Atur Ulang Password</a></p>
<p>Abaikan email ini jika Anda tidak meminta pengaturan ulang password.</p>
{{/inline}}{{/layout}}"#;

const REPORT_VERIFIED: &str = r#"{{#> layout}}{{#*inline "body"}}
<p>Laporan Anda untuk <strong>{{item_name}}</strong> telah diverifikasi dan kini tampil di daftar laporan.</p>
{{/inline}}{{/layout}}"#;

const REPORT_REJECTED: &str = r#"{{#> layout}}{{#*inline "body"}}
<p>Laporan Anda untuk <strong>{{item_name}}</strong> ditolak.</p>
<p>Alasan: {{reason}}</p>
{{/inline}}{{/layout}}"#;

const CLAIM_APPROVED: &str = r#"{{#> layout}}{{#*inline "body"}}
<p>Klaim Anda atas <strong>{{item_name}}</strong> telah disetujui. Silakan hubungi admin untuk proses serah terima.</p>
{{/inline}}{{/layout}}"#;

const CLAIM_REJECTED: &str = r#"{{#> layout}}{{#*inline "body"}}
<p>Klaim Anda atas <strong>{{item_name}}</strong> ditolak.</p>
<p>Alasan: {{reason}}</p>
{{/inline}}{{/layout}}"#;

const NEW_CLAIM: &str = r#"{{#> layout}}{{#*inline "body"}}
<p>Ada klaim baru dari {{claimant}} untuk laporan <strong>{{item_name}}</strong>.</p>
{{/inline}}{{/layout}}"#;

/// Compiled email templates
#[derive(Debug)]
pub struct EmailTemplates {
    registry: Handlebars<'static>,
}

impl EmailTemplates {
    /// Compiles every template
    pub fn new() -> Result<Self, NotifyError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_partial("layout", LAYOUT)?;
        for (name, source) in [
            ("verification", VERIFICATION),
            ("password_reset", PASSWORD_RESET),
            ("report_verified", REPORT_VERIFIED),
            ("report_rejected", REPORT_REJECTED),
            ("claim_approved", CLAIM_APPROVED),
            ("claim_rejected", CLAIM_REJECTED),
            ("new_claim", NEW_CLAIM),
        ] {
            registry.register_template_string(name, source)?;
        }
        Ok(Self { registry })
    }

    pub fn verification(&self, name: &str, link: &str) -> Result<String, NotifyError> {
        Ok(self
            .registry
            .render("verification", &json!({ "name": name, "link": link }))?)
    }

    pub fn password_reset(&self, name: &str, link: &str, ttl_minutes: i64) -> Result<String, NotifyError> {
        Ok(self.registry.render(
            "password_reset",
            &json!({ "name": name, "link": link, "ttl_minutes": ttl_minutes }),
        )?)
    }

    pub fn report_verified(&self, item_name: &str) -> Result<String, NotifyError> {
        Ok(self
            .registry
            .render("report_verified", &json!({ "item_name": item_name }))?)
    }

    pub fn report_rejected(&self, item_name: &str, reason: &str) -> Result<String, NotifyError> {
        Ok(self.registry.render(
            "report_rejected",
            &json!({ "item_name": item_name, "reason": reason }),
        )?)
    }

    pub fn claim_approved(&self, item_name: &str) -> Result<String, NotifyError> {
        Ok(self
            .registry
            .render("claim_approved", &json!({ "item_name": item_name }))?)
    }

    pub fn claim_rejected(&self, item_name: &str, reason: &str) -> Result<String, NotifyError> {
        Ok(self.registry.render(
            "claim_rejected",
            &json!({ "item_name": item_name, "reason": reason }),
        )?)
    }

    pub fn new_claim(&self, item_name: &str, claimant: &str) -> Result<String, NotifyError> {
        Ok(self.registry.render(
            "new_claim",
            &json!({ "item_name": item_name, "claimant": claimant }),
        )?)
    }
}
