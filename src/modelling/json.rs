use super::{Model, ModelError, StandardForm};
use crate::engine::{QpEngine, Settings};

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

// An assembled problem together with the settings it is solved with.
// JSON has no infinities, so these are written as ±f64::MAX.

#[derive(Serialize, Deserialize)]
struct JsonProblemData {
    problem: StandardForm,
    settings: Settings<f64>,
}

impl StandardForm {
    /// Write the problem and `settings` to `file` as JSON.
    pub fn write_to_file(&self, settings: &Settings<f64>, file: &mut File) -> Result<(), io::Error> {
        let mut json_data = JsonProblemData {
            problem: self.clone(),
            settings: settings.clone(),
        };

        sanitize_bounds(&mut json_data.problem.l);
        sanitize_bounds(&mut json_data.problem.u);
        sanitize_settings(&mut json_data.settings);

        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    /// Read a problem and its settings written by
    /// [`write_to_file`](StandardForm::write_to_file).
    pub fn read_from_file(file: &mut File) -> Result<(Self, Settings<f64>), io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let mut json_data: JsonProblemData = serde_json::from_str(&buffer)?;

        // restore sanitized values to their (likely) original values
        desanitize_bounds(&mut json_data.problem.l);
        desanitize_bounds(&mut json_data.problem.u);
        desanitize_settings(&mut json_data.settings);

        if let Err(e) = json_data.problem.P.check_format() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, e));
        }
        if let Err(e) = json_data.problem.A.check_format() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, e));
        }

        Ok((json_data.problem, json_data.settings))
    }
}

impl<E> Model<E>
where
    E: QpEngine<f64>,
{
    /// Write the assembled problem and the current settings to `file`.
    pub fn write_to_file(&self, file: &mut File) -> Result<(), ModelError> {
        let sf = self.standard_form()?;
        sf.write_to_file(self.settings(), file)?;
        Ok(())
    }
}

fn sanitize_bounds(v: &mut [f64]) {
    for b in v.iter_mut() {
        if *b == f64::INFINITY {
            *b = f64::MAX;
        } else if *b == f64::NEG_INFINITY {
            *b = -f64::MAX;
        }
    }
}

fn desanitize_bounds(v: &mut [f64]) {
    for b in v.iter_mut() {
        if *b == f64::MAX {
            *b = f64::INFINITY;
        } else if *b == -f64::MAX {
            *b = f64::NEG_INFINITY;
        }
    }
}

fn sanitize_settings(settings: &mut Settings<f64>) {
    if settings.time_limit == f64::INFINITY {
        settings.time_limit = f64::MAX;
    }
}

fn desanitize_settings(settings: &mut Settings<f64>) {
    if settings.time_limit == f64::MAX {
        settings.time_limit = f64::INFINITY;
    }
}

#[test]
fn test_json_io() {
    use crate::modelling::Constraint;
    use std::io::{Seek, SeekFrom};

    let mut model = Model::new();
    let x = model.add_variable();
    let y = model.add_variable();
    model.set_objective(x * x + x * y + 2. * y + 1.);
    model.add_constraint(Constraint::ge(x + y, 1.));
    model.add_constraint(Constraint::le(y, 3.));
    model.settings_mut().max_iter = 123;

    // write the problem to a file
    let mut file = tempfile::tempfile().unwrap();
    model.write_to_file(&mut file).unwrap();

    // read the problem from the file
    file.seek(SeekFrom::Start(0)).unwrap();
    let (sf, settings) = StandardForm::read_from_file(&mut file).unwrap();

    assert_eq!(sf, model.standard_form().unwrap());
    assert_eq!(&settings, model.settings());
    assert!(settings.time_limit.is_infinite());
    assert_eq!(sf.u[0], f64::INFINITY);
    assert_eq!(sf.l[1], f64::NEG_INFINITY);
}
