// SPDX-FileCopyrightText: 2026 Leadgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTML email body for product delivery.

const BODY_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif; color: #1a1a1a; max-width: 600px; margin: 0 auto;">
    <h2>Hi {{customer_name}},</h2>
    <p>Thanks for your purchase! Your copy of <strong>{{product_name}}</strong> is attached to this email.</p>
    <p>Save the file somewhere handy &mdash; this link does not expire, but inboxes do get cleaned up.</p>
    <p style="color: #6b6b6b; font-size: 13px;">If you did not expect this email, you can safely ignore it.</p>
  </body>
</html>
"#;

/// Render the delivery email body for one customer/product pair.
///
/// Substitution is plain string replacement; the two values come from our
/// own records, not arbitrary user markup.
pub fn render(customer_name: &str, product_name: &str) -> String {
    BODY_TEMPLATE
        .replace("{{customer_name}}", customer_name)
        .replace("{{product_name}}", product_name)
}
