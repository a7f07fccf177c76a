//! CLI tool to download exam PDFs through the resolver endpoint.
//!
//! Usage:
//!   cargo run --bin fetch-exam-pdfs -- --year 2024 --month 3 --grade 3 --subject all --type 문제

use std::env;
use std::path::PathBuf;

use exam_pdf_lib::client::{DEFAULT_API_URL, DownloadClient, ExamRequest, SUBJECTS, select_subjects};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    let mut api_url = env::var("PDF_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let mut year: Option<String> = None;
    let mut month: Option<String> = None;
    let mut grade: Option<String> = None;
    let mut subject: Option<String> = None;
    let mut doc_type = "문제".to_string();
    let mut out_dir = PathBuf::from("downloads");

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--api-url" => api_url = value.unwrap_or(api_url),
            "--year" | "-y" => year = value,
            "--month" | "-m" => month = value,
            "--grade" | "-g" => grade = value,
            "--subject" | "-s" => subject = value,
            "--type" | "-t" => doc_type = value.unwrap_or(doc_type),
            "--out" | "-o" => out_dir = value.map(PathBuf::from).unwrap_or(out_dir),
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 2;
    }

    let (Some(year), Some(month), Some(grade), Some(subject)) = (year, month, grade, subject)
    else {
        eprintln!("Error: --year, --month, --grade and --subject are required");
        print_usage();
        std::process::exit(1);
    };

    let subjects = match select_subjects(&subject) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let client = match DownloadClient::new(api_url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("=== 모의고사 PDF 다운로더 ===\n");

    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for subject in subjects {
        println!("요청 중: {}년 고{} {}월 {} {}...", year, grade, month, subject, doc_type);

        let exam = ExamRequest {
            year: year.clone(),
            month: month.clone(),
            grade: grade.clone(),
            subject,
            doc_type: doc_type.clone(),
        };

        match client.download_to(&exam, &out_dir).await {
            Ok((path, size)) => {
                println!(
                    "  저장 완료: {} ({:.1} KB)",
                    path.display(),
                    size as f64 / 1024.0
                );
                succeeded += 1;
            }
            Err(e) => {
                println!("  실패: {}", e);
                failed += 1;
            }
        }
    }

    println!("\n완료: 성공 {}개, 실패 {}개", succeeded, failed);

    if succeeded == 0 {
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        r#"
Usage: fetch-exam-pdfs --year <YEAR> --month <MONTH> --grade <GRADE> --subject <SUBJECT> [OPTIONS]

Options:
  -y, --year <YEAR>        Exam year, e.g. 2024
  -m, --month <MONTH>      Exam month (3, 4, 6, 7, 9, 10)
  -g, --grade <GRADE>      School grade (1, 2, 3)
  -s, --subject <SUBJECT>  Subject name, number from the list below, or "all"
  -t, --type <TYPE>        문제 or 해설 (default: 문제)
  -o, --out <DIR>          Output directory (default: downloads)
      --api-url <URL>      Download endpoint (default: $PDF_API_URL or {})
  -h, --help               Show this help message

Subjects:"#,
        DEFAULT_API_URL
    );
    for (i, s) in SUBJECTS.iter().enumerate() {
        eprintln!("  {:2}. {}", i + 1, s);
    }
}
