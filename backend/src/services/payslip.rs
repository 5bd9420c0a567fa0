//! Payslip document shared by the print view and the email body.

use std::fmt::Write;

use crate::{config::Letterhead, models::payroll::PayrollLine};

pub struct PayslipContext<'a> {
    pub employee_name: &'a str,
    pub year: i32,
    pub month: u32,
    pub line: &'a PayrollLine,
    /// Rate behind `line.tax`, shown in the tax row label.
    pub tax_rate: f64,
    pub letterhead: &'a Letterhead,
}

pub fn subject(year: i32, month: u32) -> String {
    format!("Phiếu lương tháng {}/{}", month, year)
}

pub fn render(ctx: &PayslipContext<'_>) -> String {
    let line = ctx.line;
    let head = ctx.letterhead;
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"vi\">\n<head><meta charset=\"UTF-8\"><title>");
    html.push_str(&escape_html(&subject(ctx.year, ctx.month)));
    html.push_str("</title></head>\n");
    html.push_str(
        "<body style=\"font-family: Arial, sans-serif; color: #000; margin: 0; padding: 20px;\">\n",
    );
    html.push_str("<div style=\"max-width: 700px; margin: 0 auto;\">\n");

    let _ = write!(
        html,
        "<table width=\"100%\" style=\"border-bottom: 2px solid #333; margin-bottom: 20px;\"><tr>\
         <td width=\"120\"><img src=\"{logo}\" alt=\"{company}\" style=\"max-width: 110px;\"></td>\
         <td style=\"font-size: 12px;\"><strong>{company}</strong><br>\
         Head office: {head_office}<br>Rep. office: {rep_office}<br>\
         Tax code: {tax_code} | Tel: {phone}<br>{website} | {email}</td></tr></table>\n",
        logo = escape_html(&head.logo_url),
        company = escape_html(&head.company_name),
        head_office = escape_html(&head.head_office),
        rep_office = escape_html(&head.rep_office),
        tax_code = escape_html(&head.tax_code),
        phone = escape_html(&head.phone),
        website = escape_html(&head.website),
        email = escape_html(&head.email),
    );

    let _ = write!(
        html,
        "<div style=\"text-align: center; margin-bottom: 20px;\">\
         <h1 style=\"margin: 0 0 10px 0; font-size: 24px;\">PHIẾU LƯƠNG THÁNG {}/{}</h1>\
         <h3 style=\"margin: 0; font-size: 18px; font-weight: normal;\">{}</h3></div>\n",
        ctx.month,
        ctx.year,
        escape_html(ctx.employee_name),
    );

    html.push_str(
        "<table width=\"100%\" cellspacing=\"0\" cellpadding=\"8\" style=\"font-size: 14px; border-collapse: collapse;\">\n",
    );
    let tax_label = format!("Thuế TNCN ({}%)", format_percent(ctx.tax_rate));
    let rows = [
        ("Lương Căn Bản", format_vnd(line.basic_salary)),
        (
            "Giờ Công Chuẩn",
            format!(
                "{} giờ ({} ngày)",
                format_hours(line.standard_hours_in_month),
                line.workdays_in_month
            ),
        ),
        ("Số Giờ Phép Dùng", format!("{} giờ", format_hours(line.total_leave))),
        (
            "Số Giờ Phép Còn Lại",
            format!("{} giờ", format_hours(line.leave_hours_remaining)),
        ),
        (
            "Tổng Giờ Onsite (Trong tỉnh)",
            format!("{} giờ", format_hours(line.total_onsite_in)),
        ),
        (
            "Tổng Giờ Onsite (Ngoài tỉnh)",
            format!("{} giờ", format_hours(line.total_onsite_out)),
        ),
        (
            "Tổng Giờ OT (Quy đổi)",
            format!("{:.1} giờ", line.total_converted_ot),
        ),
        ("Tổng Giờ Công", format!("{:.1} giờ", line.total_work)),
        ("Phụ Cấp", format_vnd(line.allowance)),
        ("Tổng Lương (Trước Thuế)", format_vnd(line.wage_before_tax)),
        (tax_label.as_str(), format!("-{}", format_vnd(line.tax))),
    ];
    for (label, value) in rows {
        let _ = writeln!(
            html,
            "<tr><td width=\"60%\" style=\"border-bottom: 1px solid #eee;\"><strong>{}:</strong></td>\
             <td align=\"right\" style=\"border-bottom: 1px solid #eee;\">{}</td></tr>",
            label, value
        );
    }
    html.push_str("</table>\n");

    let _ = write!(
        html,
        "<div style=\"margin-top: 25px; border-top: 2px solid #333; padding-top: 15px;\">\
         <table width=\"100%\"><tr><td style=\"font-size: 16px; font-weight: bold;\">Lương Nhận Được:</td>\
         <td align=\"right\" style=\"font-size: 20px; font-weight: bold; color: #10b981;\">{}</td></tr></table></div>\n",
        format_vnd(line.net_salary)
    );

    let _ = write!(
        html,
        "<div style=\"margin-top: 40px; text-align: center; font-size: 12px; color: #888;\">\
         <p>Email này được gửi tự động từ hệ thống {}.</p>\
         <p>Vui lòng không trả lời lại email này.</p></div>\n",
        escape_html(&head.portal_name)
    );

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// `0.1` → `10`, `0.125` → `12.5`.
fn format_percent(rate: f64) -> String {
    let percent = (rate * 1000.0).round() / 10.0;
    if percent.fract() == 0.0 {
        format!("{}", percent as i64)
    } else {
        format!("{}", percent)
    }
}

/// `10500000` → `10.500.000 VNĐ`.
pub fn format_vnd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{} VNĐ", grouped)
    } else {
        format!("{} VNĐ", grouped)
    }
}

/// Whole numbers print without decimals, others with at most two.
fn format_hours(hours: f64) -> String {
    let rounded = (hours * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        let text = format!("{:.2}", rounded);
        text.trim_end_matches('0').to_string()
    }
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
