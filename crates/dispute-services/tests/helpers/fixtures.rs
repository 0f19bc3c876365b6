use dispute_core::{Attachment, DisputeForm, FormField};

pub const SHIPMENT: &str = "MSCU1234567";

pub fn pdf(name: &str) -> Attachment {
    Attachment::new(name, "application/pdf", b"%PDF-1.4 test".to_vec())
}

pub fn png(name: &str) -> Attachment {
    Attachment::new(name, "image/png", b"PNG test bytes".to_vec())
}

/// A form with every field filled in and no attachments.
pub fn filled_form() -> DisputeForm {
    let mut form = DisputeForm::new();
    for field in FormField::ALL {
        let value = match field {
            FormField::Bl => SHIPMENT.to_string(),
            FormField::ContainerInfo => "MSCU7654321".to_string(),
            FormField::DischargeDate => "2024-03-01".to_string(),
            FormField::ContainerReturnDate => "2024-03-20".to_string(),
            FormField::FirstReturnAttemptDate => "2024-03-18".to_string(),
            other => format!("{} answer", other.wire_name()),
        };
        form.set_field(field, value).expect("fresh form is editable");
    }
    form
}

/// A filled form with `a.pdf` and `b report.png` attached.
pub fn filled_form_with_files() -> DisputeForm {
    let mut form = filled_form();
    let mut selection = vec![pdf("a.pdf"), png("b report.png")];
    form.add_files(&mut selection).expect("fresh form is editable");
    form
}
