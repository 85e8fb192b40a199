use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn tabclean() -> Command {
    Command::cargo_bin("tabclean").unwrap()
}

const STAFF: &str = "\
First Name,Last Name,Hire Date,Dept
Ann,Smith,43831,Sales
Bob,Jones,43831,Sales
Cal,Smith,44348,Ops
Dee,Smith,43831,Ops
,,,
";

#[test]
fn clean_normalizes_headers_and_prunes() {
    let file = csv_file(STAFF);
    tabclean()
        .args(["clean", "--case", "snake", "--prune", "rows", "--dates", "hire_date", "-f", "csv"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "first_name,last_name,hire_date,dept\nAnn,Smith,2020-01-01,Sales\n",
        ))
        .stdout(predicate::str::contains("Dee,Smith,2020-01-01,Ops\n"))
        .stdout(predicate::str::ends_with("Ops\n"));
}

#[test]
fn dupes_reports_group_sizes() {
    let file = csv_file(STAFF);
    tabclean()
        .args(["dupes", "--case", "snake", "-k", "last_name,hire_date", "-f", "csv"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("first_name,last_name,hire_date,dept,dupe_count\nAnn,Smith,43831,Sales,2\nDee,Smith,43831,Ops,2\n");
}

#[test]
fn tabyl_formats_row_percentages() {
    let file = csv_file("dept,outcome\na,x\na,x\na,x\na,y\nb,x\nb,x\nb,y\nb,y\nb,y\nb,y\n");
    tabclean()
        .args(["tabyl", "-b", "dept,outcome", "--totals", "row", "--percent", "row", "-f", "csv"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("dept,x,y\na,75.0%,25.0%\nb,33.3%,66.7%\nTotal,50.0%,50.0%\n");
}

#[test]
fn tabyl_title_on_percentages_needs_counts() {
    let file = csv_file("dept,outcome\na,x\na,y\nb,y\n");
    tabclean()
        .args(["tabyl", "-b", "dept,outcome", "--percent", "row", "--title", "combined"])
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid adornments"));

    tabclean()
        .args(["tabyl", "-b", "dept,outcome", "--percent", "row", "--ns", "combined"])
        .args(["--title", "combined", "-f", "csv"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("dept/outcome,x,y\na,50.0% (1),50.0% (1)\nb,0.0% (0),100.0% (1)\n");
}

#[test]
fn tabyl_header_only_file() {
    let file = csv_file("g\n");
    tabclean()
        .args(["tabyl", "-b", "g", "--totals", "row", "-f", "csv"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("g,n\nTotal,0\n");
}

#[test]
fn tabyl_one_way_json() {
    let file = csv_file("grade\nA\nB\nA\n\n");
    tabclean()
        .args(["tabyl", "-b", "grade", "-f", "json"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"n\": 2.0"))
        .stdout(predicate::str::contains("\"state\": \"raw\""));
}

#[test]
fn tabyl_terminal_grid() {
    let file = csv_file("dept,outcome\na,x\nb,y\n");
    tabclean()
        .args(["tabyl", "-b", "dept,outcome", "--title", "top"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("outcome"))
        .stdout(predicate::str::contains("dept"));
}

#[test]
fn repeated_headers_without_case_fail() {
    let file = csv_file("a,a\n1,2\n");
    tabclean()
        .arg("clean")
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn too_many_dimensions_fail() {
    let file = csv_file("a,b,c,d\n1,2,3,4\n");
    tabclean()
        .args(["tabyl", "-b", "a,b,c,d"])
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("dimensions"));
}

#[test]
fn unsupported_format_fails() {
    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    tabclean()
        .arg("clean")
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported file format"));
}
