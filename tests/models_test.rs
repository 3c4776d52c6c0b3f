use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use docuquiz::error::Error;
use docuquiz::models::document::{mime_type_for, DocumentReference, DOCX_MIME, PDF_MIME};
use docuquiz::models::quiz_config::QuizConfig;
use validator::Validate;

#[test]
fn extension_to_mime_lookup() {
    assert_eq!(mime_type_for("exam.pdf"), PDF_MIME);
    assert_eq!(mime_type_for("Exam.PDF"), PDF_MIME);
    assert_eq!(mime_type_for("homework.docx"), DOCX_MIME);
    assert_eq!(mime_type_for("notes.txt"), "text/plain");
    assert_eq!(mime_type_for("no_extension"), "text/plain");
}

#[test]
fn document_reference_encodes_payload_as_base64() {
    let doc = DocumentReference::from_bytes("exam.pdf", Bytes::from_static(b"%PDF-1.4")).unwrap();
    assert_eq!(doc.display_name, "exam.pdf");
    assert_eq!(doc.mime_type, PDF_MIME);
    assert_eq!(BASE64.decode(&doc.payload).unwrap(), b"%PDF-1.4");
}

#[test]
fn unsupported_extensions_are_rejected_at_the_boundary() {
    for name in ["image.png", "archive.zip", "legacy.doc", "plain.txt"] {
        let err = DocumentReference::from_bytes(name, Bytes::from_static(b"data"));
        assert!(matches!(err, Err(Error::InvalidFileType(_))), "{}", name);
    }
}

#[test]
fn quiz_config_bounds() {
    let ok = QuizConfig {
        number_of_questions: 1,
        duration_minutes: 1,
    };
    assert!(ok.validate().is_ok());

    let no_questions = QuizConfig {
        number_of_questions: 0,
        duration_minutes: 15,
    };
    assert!(no_questions.validate().is_err());

    let no_time = QuizConfig {
        number_of_questions: 10,
        duration_minutes: 0,
    };
    assert!(no_time.validate().is_err());
}
