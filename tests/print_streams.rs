#![allow(non_snake_case)]

use qpmodel::{io::ConfigurablePrintTarget, modelling::*};

fn test_print_model() -> Model {
    let mut model = Model::new();
    let x = model.add_variable();
    model.set_objective(x * x - 2. * x);
    model.add_constraint(Constraint::le(x, 0.5));
    model.settings_mut().verbose = true;
    model
}

#[test]
fn test_print_to_stdout() {
    let mut model = test_print_model();
    model.print_to_stdout();
    model.solve().unwrap();
}

#[test]
fn test_print_to_buffer() {
    let mut model = test_print_model();
    model.print_to_buffer();
    model.solve().unwrap();
    let result = model.get_print_buffer().unwrap();
    assert!(result.contains("qpmodel"));
    assert!(result.contains("session       = setup"));
    assert!(result.contains("Terminated with status = Solved"));

    // the second solve reuses the session
    model.print_to_buffer();
    model.solve().unwrap();
    let result = model.get_print_buffer().unwrap();
    assert!(result.contains("session       = update in place"));
}

#[test]
fn test_print_quiet() {
    let mut model = test_print_model();
    model.settings_mut().verbose = false;
    model.print_to_buffer();
    model.solve().unwrap();
    assert!(model.get_print_buffer().unwrap().is_empty());
}

#[test]
fn test_print_to_file() {
    use std::io::{Read, Seek};

    let mut model = test_print_model();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    model.print_to_file(file.into_file());
    model.solve().unwrap();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("qpmodel"));
}

#[test]
fn test_print_to_stream() {
    use std::io::{Read, Seek};

    let mut model = test_print_model();
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut file2 = file.reopen().unwrap();
    let stream = Box::new(file.into_file());

    model.print_to_stream(stream);
    model.solve().unwrap();

    file2.seek(std::io::SeekFrom::Start(0)).unwrap();
    let mut result = String::new();
    file2.read_to_string(&mut result).unwrap();
    assert!(result.contains("qpmodel"));
}

#[test]
fn test_print_to_sink() {
    let mut model = test_print_model();
    model.print_to_sink();
    model.solve().unwrap();
    assert!(model.get_print_buffer().is_err());
}
