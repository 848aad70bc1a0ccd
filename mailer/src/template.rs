//! Plain-text notification mails sent by the portal.

use crate::MailPayload;

const SIGNATURE: &str = "UNESCO Participation Programme Secretariat";

pub fn verification(to: &str, name: &str, link: &str, ttl_secs: &u64) -> MailPayload {
    MailPayload::new(
        to,
        "Verify your email address",
        &format!(
            "Dear {name},\n\n\
             Thank you for registering on the Participation Programme portal.\n\
             Please confirm your email address by opening the link below:\n\n\
             {link}\n\n\
             This link expires in {}.\n\n\
             {SIGNATURE}",
            human_duration(ttl_secs)
        ),
    )
}

pub fn two_factor_code(to: &str, name: &str, code: &str, ttl_secs: &u64) -> MailPayload {
    MailPayload::new(
        to,
        "Your sign-in code",
        &format!(
            "Dear {name},\n\n\
             Your sign-in code is {code}. It expires in {}.\n\
             If you did not try to sign in, please change your password.\n\n\
             {SIGNATURE}",
            human_duration(ttl_secs)
        ),
    )
}

pub fn password_reset(to: &str, name: &str, link: &str, ttl_secs: &u64) -> MailPayload {
    MailPayload::new(
        to,
        "Reset your password",
        &format!(
            "Dear {name},\n\n\
             A password reset was requested for your account. Open the link below to choose a new password:\n\n\
             {link}\n\n\
             This link expires in {}. If you did not request a reset, you can ignore this email.\n\n\
             {SIGNATURE}",
            human_duration(ttl_secs)
        ),
    )
}

pub fn password_reset_done(to: &str, name: &str) -> MailPayload {
    MailPayload::new(
        to,
        "Your password has been changed",
        &format!(
            "Dear {name},\n\n\
             The password of your Participation Programme account has been changed and all \
             active sessions were signed out.\n\n\
             {SIGNATURE}"
        ),
    )
}

pub fn application_received(
    to: &str,
    name: &str,
    title: &str,
    reference: &str,
    total_budget: &i64,
) -> MailPayload {
    MailPayload::new(
        to,
        &format!("Application received: {title}"),
        &format!(
            "Dear {name},\n\n\
             We have received your application \"{title}\" (reference {reference}) requesting \
             USD {total_budget}.\n\
             Its status is now pending review. You will be notified once a decision is made.\n\n\
             {SIGNATURE}"
        ),
    )
}

pub fn application_decision(
    to: &str,
    name: &str,
    title: &str,
    approved: bool,
    marks: &Option<i32>,
    feedback: &Option<String>,
) -> MailPayload {
    let (subject, verdict) = if approved {
        (
            format!("Application approved: {title}"),
            "We are pleased to inform you that your application has been approved.",
        )
    } else {
        (
            format!("Application not approved: {title}"),
            "We regret to inform you that your application has not been approved.",
        )
    };

    let mut body = format!("Dear {name},\n\n{verdict}\n");
    if let Some(marks) = marks {
        body += &format!("\nEvaluation marks: {marks}/100\n");
    }
    if let Some(feedback) = feedback.as_deref().filter(|f| !f.trim().is_empty()) {
        body += &format!("\nReviewer feedback:\n{feedback}\n");
    }
    body += &format!("\n{SIGNATURE}");

    MailPayload::new(to, &subject, &body)
}

pub fn message_received(to: &str, name: &str, subject: &str) -> MailPayload {
    MailPayload::new(
        to,
        &format!("We received your message: {subject}"),
        &format!(
            "Dear {name},\n\n\
             Thank you for contacting the Participation Programme. Your message has been \
             forwarded to the secretariat and we will reply as soon as possible.\n\n\
             {SIGNATURE}"
        ),
    )
}

fn human_duration(secs: &u64) -> String {
    match *secs {
        s if s >= 86400 && s % 86400 == 0 => plural(s / 86400, "day"),
        s if s >= 3600 && s % 3600 == 0 => plural(s / 3600, "hour"),
        s if s >= 60 && s % 60 == 0 => plural(s / 60, "minute"),
        s => plural(s, "second"),
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_durations() {
        assert_eq!(human_duration(&86400), "1 day");
        assert_eq!(human_duration(&7200), "2 hours");
        assert_eq!(human_duration(&600), "10 minutes");
        assert_eq!(human_duration(&45), "45 seconds");
    }

    #[test]
    fn decision_includes_marks_and_feedback() {
        let mail = application_decision(
            "a@example.org",
            "Amina",
            "Literacy workshops",
            true,
            &Some(87),
            &Some("Strong alignment with priorities.".to_owned()),
        );

        assert_eq!(mail.to(), "a@example.org");
        assert_eq!(mail.subject(), "Application approved: Literacy workshops");
        assert!(mail.body().contains("87/100"));
        assert!(mail.body().contains("Strong alignment"));
    }

    #[test]
    fn rejection_skips_blank_feedback() {
        let mail = application_decision(
            "a@example.org",
            "Amina",
            "Literacy workshops",
            false,
            &None,
            &Some("   ".to_owned()),
        );

        assert!(mail.subject().starts_with("Application not approved"));
        assert!(!mail.body().contains("Reviewer feedback"));
        assert!(!mail.body().contains("/100"));
    }

    #[test]
    fn verification_contains_link() {
        let mail = verification(
            "a@example.org",
            "Amina",
            "https://portal.example.org/verify-email?token=abc",
            &86400,
        );

        assert!(mail.body().contains("verify-email?token=abc"));
        assert!(mail.body().contains("1 day"));
    }
}
