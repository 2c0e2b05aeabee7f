use std::{collections::BTreeMap, fmt::Display, iter::zip, path::Path};

use serde::Serialize;

use crate::{
    dataset::read_tagged,
    error::{Error, Result},
};

/// Label-wise performance values.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LabelMeasure {
    /// Number of correct predictions.
    pub num_correct: usize,
    /** Number of occurrences of the label in the gold-standard data. */
    pub num_observation: usize,
    /** Number of predictions. */
    pub num_prediction: usize,
    pub precision: f64,
    pub recall: f64,
    /** F1 score. */
    pub fmeasure: f64,
}

/// Accumulates predictions against the reference labels.
#[derive(Debug, Default)]
pub struct Evaluation {
    tbl: BTreeMap<String, LabelMeasure>,

    /** Number of correctly predicted items. */
    item_total_correct: usize,
    /** Total number of items. */
    item_total_num: usize,

    /** Number of correctly predicted sentences. */
    inst_total_correct: usize,
    /** Total number of sentences. */
    inst_total_num: usize,
}

/// Summary computed by [`Evaluation::evaluate`].
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Report {
    pub labels: BTreeMap<String, LabelMeasure>,
    pub item_total_correct: usize,
    pub item_total_num: usize,
    /// Token-level accuracy, 0 when nothing was compared.
    pub item_accuracy: f64,
    pub inst_total_correct: usize,
    pub inst_total_num: usize,
    pub inst_accuracy: f64,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_fmeasure: f64,
}

impl Evaluation {
    /// Compares one sentence position by position.
    ///
    /// `line` is only used to report a token count mismatch.
    pub fn accumulate<R: AsRef<str>, P: AsRef<str>>(
        &mut self,
        line: usize,
        reference: &[R],
        prediction: &[P],
    ) -> Result<()> {
        if reference.len() != prediction.len() {
            return Err(Error::AlignmentMismatch {
                line,
                expected: reference.len(),
                found: prediction.len(),
            });
        }
        let mut matched = 0;
        for (r, p) in zip(reference, prediction) {
            let (r, p) = (r.as_ref(), p.as_ref());
            self.tbl.entry(r.to_string()).or_default().num_observation += 1;
            self.tbl.entry(p.to_string()).or_default().num_prediction += 1;
            if r == p {
                self.tbl.entry(r.to_string()).or_default().num_correct += 1;
                matched += 1;
            }
            self.item_total_num += 1;
        }
        self.item_total_correct += matched;

        if matched == prediction.len() {
            self.inst_total_correct += 1;
        }
        self.inst_total_num += 1;
        Ok(())
    }

    pub fn evaluate(&self) -> Report {
        let mut report = Report {
            item_total_correct: self.item_total_correct,
            item_total_num: self.item_total_num,
            inst_total_correct: self.inst_total_correct,
            inst_total_num: self.inst_total_num,
            ..Default::default()
        };

        let mut num_labels = 0;
        for (label, lev) in &self.tbl {
            let mut lev = lev.clone();
            if lev.num_prediction > 0 {
                lev.precision = lev.num_correct as f64 / lev.num_prediction as f64;
            }
            if lev.num_observation > 0 {
                lev.recall = lev.num_correct as f64 / lev.num_observation as f64;
            }
            if lev.precision + lev.recall > 0.0 {
                lev.fmeasure = lev.precision * lev.recall * 2.0 / (lev.precision + lev.recall);
            }
            /* Labels that never occur in the reference do not count towards the macro average. */
            if lev.num_observation > 0 {
                num_labels += 1;
                report.macro_precision += lev.precision;
                report.macro_recall += lev.recall;
                report.macro_fmeasure += lev.fmeasure;
            }
            report.labels.insert(label.clone(), lev);
        }

        if num_labels > 0 {
            report.macro_precision /= num_labels as f64;
            report.macro_recall /= num_labels as f64;
            report.macro_fmeasure /= num_labels as f64;
        }
        if self.item_total_num > 0 {
            report.item_accuracy = self.item_total_correct as f64 / self.item_total_num as f64;
        }
        if self.inst_total_num > 0 {
            report.inst_accuracy = self.inst_total_correct as f64 / self.inst_total_num as f64;
        }
        report
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance by label (#match, #model, #ref) (precision, recall, F1):")?;
        for (label, lev) in &self.labels {
            if lev.num_observation == 0 {
                writeln!(f, "\t{}: ({}, {}, {}) (******, ******, ******)", label, lev.num_correct, lev.num_prediction, lev.num_observation)?;
            } else {
                writeln!(f, "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})", label, lev.num_correct, lev.num_prediction, lev.num_observation,
                    lev.precision, lev.recall, lev.fmeasure
                )?;
            }
        }
        writeln!(f, "Macro-average precision, recall, F1: ({:.6}, {:.6}, {:.6})", self.macro_precision, self.macro_recall, self.macro_fmeasure)?;
        writeln!(f, "Item accuracy: {} / {} ({:.4})", self.item_total_correct, self.item_total_num, self.item_accuracy)?;
        write!(f, "Sentence accuracy: {} / {} ({:.4})", self.inst_total_correct, self.inst_total_num, self.inst_accuracy)
    }
}

/// Scores a tagged prediction file against a line-aligned reference file.
pub fn evaluate_files<P: AsRef<Path>, Q: AsRef<Path>>(prediction: P, reference: Q) -> Result<Report> {
    let prediction = read_tagged(prediction)?;
    let reference = read_tagged(reference)?;
    if prediction.len() != reference.len() {
        return Err(Error::AlignmentMismatch {
            line: 0,
            expected: reference.len(),
            found: prediction.len(),
        });
    }
    let mut evaluation = Evaluation::default();
    for (i, (p, r)) in zip(&prediction, &reference).enumerate() {
        evaluation.accumulate(i + 1, &r.tags, &p.tags)?;
    }
    let report = evaluation.evaluate();
    log::info!("accuracy: {}", report.item_accuracy);
    Ok(report)
}
