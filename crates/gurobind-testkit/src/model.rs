//! Model state and the operations the stand-in performs on it.

use crate::env::StubEnv;
use crate::ledger::HandleId;
use gurobind_sys::{
    GRB_BINARY, GRB_CONTINUOUS, GRB_EQUAL, GRB_ERROR_DATA_NOT_AVAILABLE,
    GRB_ERROR_FILE_READ, GRB_ERROR_FILE_WRITE, GRB_ERROR_IIS_NOT_INFEASIBLE,
    GRB_ERROR_INDEX_OUT_OF_RANGE, GRB_ERROR_INVALID_ARGUMENT, GRB_ERROR_UNKNOWN_ATTRIBUTE,
    GRB_ERROR_VALUE_OUT_OF_RANGE, GRB_GREATER_EQUAL, GRB_INFEASIBLE, GRB_INFINITY, GRB_INTEGER,
    GRB_LESS_EQUAL, GRB_LOADED, GRB_MAXIMIZE, GRB_MINIMIZE, GRB_OPTIMAL, GRB_SEMICONT,
    GRB_SEMIINT, GRB_UNDEFINED,
};
use std::collections::BTreeMap;
use std::ffi::{CString, c_char, c_double, c_int};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const FILE_HEADER: &str = "\\ gurobind-testkit model";

#[derive(Debug, Clone)]
pub(crate) struct Var {
    pub(crate) obj: c_double,
    pub(crate) lb: c_double,
    pub(crate) ub: c_double,
    pub(crate) vtype: c_char,
    pub(crate) name: String,
    pub(crate) branch_priority: c_int,
    pub(crate) start: c_double,
}

impl Var {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            obj: 0.0,
            lb: 0.0,
            ub: GRB_INFINITY,
            vtype: GRB_CONTINUOUS,
            name: format!("C{index}"),
            branch_priority: 0,
            start: GRB_UNDEFINED,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Constr {
    pub(crate) terms: Vec<(c_int, c_double)>,
    pub(crate) sense: c_char,
    pub(crate) rhs: c_double,
    pub(crate) name: String,
}

#[derive(Debug, Clone)]
pub(crate) struct QConstr {
    pub(crate) linear: Vec<(c_int, c_double)>,
    pub(crate) quad: Vec<(c_int, c_int, c_double)>,
    pub(crate) sense: c_char,
    pub(crate) rhs: c_double,
    pub(crate) name: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ObjectiveN {
    pub(crate) priority: c_int,
    pub(crate) weight: c_double,
    pub(crate) abstol: c_double,
    pub(crate) reltol: c_double,
    pub(crate) name: String,
    pub(crate) constant: c_double,
    pub(crate) terms: Vec<(c_int, c_double)>,
}

#[derive(Debug, Clone, Default)]
struct Iis {
    lb: Vec<bool>,
    ub: Vec<bool>,
    constrs: Vec<bool>,
}

#[derive(Debug)]
pub(crate) struct StubModel {
    pub(crate) id: HandleId,
    pub(crate) env: Box<StubEnv>,
    name: String,
    sense: c_int,
    obj_con: c_double,
    vars: Vec<Var>,
    constrs: Vec<Constr>,
    qconstrs: Vec<QConstr>,
    qp_terms: Vec<(c_int, c_int, c_double)>,
    objectives: BTreeMap<c_int, ObjectiveN>,
    status: c_int,
    solution: Option<Vec<c_double>>,
    obj_val: Option<c_double>,
    iis: Option<Iis>,
    /// Backing storage for strings handed out by the string attribute getters.
    scratch: Vec<CString>,
}

pub(crate) fn valid_sense(sense: c_char) -> bool {
    sense == GRB_LESS_EQUAL || sense == GRB_GREATER_EQUAL || sense == GRB_EQUAL
}

pub(crate) fn valid_vtype(vtype: c_char) -> bool {
    [GRB_CONTINUOUS, GRB_BINARY, GRB_INTEGER, GRB_SEMICONT, GRB_SEMIINT].contains(&vtype)
}

impl StubModel {
    /// A model whose environment is a copy of `master`, as the real library does.
    pub(crate) fn new(id: HandleId, master: &StubEnv, name: String, vars: Vec<Var>) -> Self {
        let mut env = master.clone();
        env.id = id;
        Self {
            id,
            env: Box::new(env),
            name,
            sense: GRB_MINIMIZE,
            obj_con: 0.0,
            vars,
            constrs: Vec::new(),
            qconstrs: Vec::new(),
            qp_terms: Vec::new(),
            objectives: BTreeMap::new(),
            status: GRB_LOADED,
            solution: None,
            obj_val: None,
            iis: None,
            scratch: Vec::new(),
        }
    }

    pub(crate) fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub(crate) fn num_constrs(&self) -> usize {
        self.constrs.len()
    }

    fn invalidate(&mut self) {
        self.status = GRB_LOADED;
        self.solution = None;
        self.obj_val = None;
        self.iis = None;
    }

    fn check_var(&self, index: c_int) -> Result<usize, c_int> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < self.vars.len())
            .ok_or(GRB_ERROR_INDEX_OUT_OF_RANGE)
    }

    fn check_constr(&self, index: c_int) -> Result<usize, c_int> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < self.constrs.len())
            .ok_or(GRB_ERROR_INDEX_OUT_OF_RANGE)
    }

    pub(crate) fn add_constr(
        &mut self,
        terms: Vec<(c_int, c_double)>,
        sense: c_char,
        rhs: c_double,
        name: Option<String>,
    ) -> Result<(), c_int> {
        if !valid_sense(sense) {
            return Err(GRB_ERROR_INVALID_ARGUMENT);
        }
        for (index, _) in &terms {
            self.check_var(*index)?;
        }
        let name = name.unwrap_or_else(|| format!("R{}", self.constrs.len()));
        self.constrs.push(Constr {
            terms,
            sense,
            rhs,
            name,
        });
        self.invalidate();
        Ok(())
    }

    /// Add constraints atomically: nothing is kept when any row is rejected.
    pub(crate) fn add_constrs(&mut self, rows: Vec<Constr>) -> Result<(), c_int> {
        for row in &rows {
            if !valid_sense(row.sense) {
                return Err(GRB_ERROR_INVALID_ARGUMENT);
            }
            for (index, _) in &row.terms {
                self.check_var(*index)?;
            }
        }
        let base = self.constrs.len();
        for (offset, mut row) in rows.into_iter().enumerate() {
            if row.name.is_empty() {
                row.name = format!("R{}", base + offset);
            }
            self.constrs.push(row);
        }
        self.invalidate();
        Ok(())
    }

    pub(crate) fn add_qconstr(&mut self, mut qconstr: QConstr) -> Result<(), c_int> {
        if !valid_sense(qconstr.sense) {
            return Err(GRB_ERROR_INVALID_ARGUMENT);
        }
        for (index, _) in &qconstr.linear {
            self.check_var(*index)?;
        }
        for (row, col, _) in &qconstr.quad {
            self.check_var(*row)?;
            self.check_var(*col)?;
        }
        if qconstr.name.is_empty() {
            qconstr.name = format!("QC{}", self.qconstrs.len());
        }
        self.qconstrs.push(qconstr);
        self.invalidate();
        Ok(())
    }

    /// Add variables with optional column coefficients `(constraint, value)`.
    pub(crate) fn add_vars(
        &mut self,
        vars: Vec<Var>,
        columns: Vec<Vec<(c_int, c_double)>>,
    ) -> Result<(), c_int> {
        for var in &vars {
            if !valid_vtype(var.vtype) {
                return Err(GRB_ERROR_INVALID_ARGUMENT);
            }
        }
        for column in &columns {
            for (constr, _) in column {
                self.check_constr(*constr)?;
            }
        }
        let base = self.vars.len();
        for (offset, var) in vars.into_iter().enumerate() {
            let var_index =
                c_int::try_from(base + offset).map_err(|_| GRB_ERROR_INDEX_OUT_OF_RANGE)?;
            if let Some(column) = columns.get(offset) {
                for (constr, value) in column {
                    self.constrs[*constr as usize].terms.push((var_index, *value));
                }
            }
            self.vars.push(var);
        }
        self.invalidate();
        Ok(())
    }

    pub(crate) fn chg_coeffs(&mut self, changes: &[(c_int, c_int, c_double)]) -> Result<(), c_int> {
        for (constr, var, _) in changes {
            self.check_constr(*constr)?;
            self.check_var(*var)?;
        }
        for (constr, var, value) in changes {
            let terms = &mut self.constrs[*constr as usize].terms;
            terms.retain(|(index, _)| index != var);
            if *value != 0.0 {
                terms.push((*var, *value));
            }
        }
        self.invalidate();
        Ok(())
    }

    pub(crate) fn add_qp_terms(&mut self, terms: &[(c_int, c_int, c_double)]) -> Result<(), c_int> {
        for (row, col, _) in terms {
            self.check_var(*row)?;
            self.check_var(*col)?;
        }
        self.qp_terms.extend_from_slice(terms);
        self.invalidate();
        Ok(())
    }

    pub(crate) fn set_objective_n(
        &mut self,
        index: c_int,
        objective: ObjectiveN,
    ) -> Result<(), c_int> {
        if index < 0 {
            return Err(GRB_ERROR_INDEX_OUT_OF_RANGE);
        }
        for (var, _) in &objective.terms {
            self.check_var(*var)?;
        }
        self.objectives.insert(index, objective);
        self.invalidate();
        Ok(())
    }

    /// The objective selected by the model's `ObjNumber` parameter.
    fn current_objective(&self) -> Result<&ObjectiveN, c_int> {
        let index = self.env.params.get_int("ObjNumber")?;
        self.objectives
            .get(&index)
            .ok_or(GRB_ERROR_DATA_NOT_AVAILABLE)
    }

    fn qconstr(&self, index: c_int) -> Result<&QConstr, c_int> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.qconstrs.get(i))
            .ok_or(GRB_ERROR_INDEX_OUT_OF_RANGE)
    }

    /// Pick the point closest to the origin inside the bounds; bounds that
    /// cross make the model infeasible.
    pub(crate) fn optimize(&mut self) {
        self.iis = None;
        if self.vars.iter().any(|var| var.lb > var.ub) {
            self.status = GRB_INFEASIBLE;
            self.solution = None;
            self.obj_val = None;
            return;
        }
        let x: Vec<c_double> = self
            .vars
            .iter()
            .map(|var| {
                if var.lb > 0.0 {
                    var.lb
                } else if var.ub < 0.0 {
                    var.ub
                } else {
                    0.0
                }
            })
            .collect();
        let linear: c_double = self.vars.iter().zip(&x).map(|(var, x)| var.obj * x).sum();
        let quadratic: c_double = self
            .qp_terms
            .iter()
            .map(|(row, col, value)| value * x[*row as usize] * x[*col as usize])
            .sum();
        self.obj_val = Some(self.obj_con + linear + quadratic);
        self.solution = Some(x);
        self.status = GRB_OPTIMAL;
    }

    pub(crate) fn compute_iis(&mut self) -> Result<(), c_int> {
        let crossed: Vec<bool> = self.vars.iter().map(|var| var.lb > var.ub).collect();
        if !crossed.iter().any(|c| *c) {
            return Err(GRB_ERROR_IIS_NOT_INFEASIBLE);
        }
        self.iis = Some(Iis {
            lb: crossed.clone(),
            ub: crossed,
            constrs: vec![false; self.constrs.len()],
        });
        Ok(())
    }

    pub(crate) fn write(&self, path: &Path) -> Result<(), c_int> {
        let mut out = String::new();
        let _ = writeln!(out, "{FILE_HEADER}");
        let _ = writeln!(out, "NAME {}", self.name);
        let _ = writeln!(out, "SENSE {}", self.sense);
        for var in &self.vars {
            let _ = writeln!(
                out,
                "VAR {} {} {} {} {}",
                var.name, var.obj, var.lb, var.ub, var.vtype as u8 as char
            );
        }
        for constr in &self.constrs {
            let terms: Vec<String> = constr
                .terms
                .iter()
                .map(|(index, value)| format!("{index}:{value}"))
                .collect();
            let _ = writeln!(
                out,
                "CONSTR {} {} {} {}",
                constr.name,
                constr.sense as u8 as char,
                constr.rhs,
                terms.join(",")
            );
        }
        fs::write(path, out).map_err(|_| GRB_ERROR_FILE_WRITE)
    }

    /// Parse a file produced by [`StubModel::write`].
    pub(crate) fn read(id: HandleId, master: &StubEnv, path: &Path) -> Result<Self, c_int> {
        let text = fs::read_to_string(path).map_err(|_| GRB_ERROR_FILE_READ)?;
        let mut lines = text.lines();
        if lines.next() != Some(FILE_HEADER) {
            return Err(GRB_ERROR_FILE_READ);
        }
        let mut model = StubModel::new(id, master, String::new(), Vec::new());
        for line in lines {
            if let Some(name) = line.strip_prefix("NAME") {
                model.name = name.trim_start().to_string();
            } else if let Some(sense) = line.strip_prefix("SENSE ") {
                model.sense = sense.trim().parse().map_err(|_| GRB_ERROR_FILE_READ)?;
            } else if let Some(rest) = line.strip_prefix("VAR ") {
                model.vars.push(parse_var(rest).ok_or(GRB_ERROR_FILE_READ)?);
            } else if let Some(rest) = line.strip_prefix("CONSTR ") {
                model.constrs.push(parse_constr(rest).ok_or(GRB_ERROR_FILE_READ)?);
            }
        }
        Ok(model)
    }

    fn take_scratch(&mut self, values: Vec<String>) -> Vec<*mut c_char> {
        self.scratch = values
            .into_iter()
            .map(|value| CString::new(value).unwrap_or_default())
            .collect();
        self.scratch
            .iter()
            .map(|value| value.as_ptr().cast_mut())
            .collect()
    }

    // Scalar attributes.

    pub(crate) fn int_attr(&self, attr: &str) -> Result<c_int, c_int> {
        let count = |n: usize| c_int::try_from(n).map_err(|_| GRB_ERROR_VALUE_OUT_OF_RANGE);
        match attr.to_ascii_lowercase().as_str() {
            "numvars" => count(self.vars.len()),
            "numconstrs" => count(self.num_constrs()),
            "numqconstrs" => count(self.qconstrs.len()),
            "numnzs" => count(self.constrs.iter().map(|c| c.terms.len()).sum()),
            "numqnzs" => count(self.qp_terms.len()),
            "numobj" => count(self.objectives.len()),
            "modelsense" => Ok(self.sense),
            "status" => Ok(self.status),
            "objnpriority" => self.current_objective().map(|o| o.priority),
            "iisminimal" => self
                .iis
                .as_ref()
                .map(|_| 1)
                .ok_or(GRB_ERROR_DATA_NOT_AVAILABLE),
            _ => Err(GRB_ERROR_UNKNOWN_ATTRIBUTE),
        }
    }

    pub(crate) fn set_int_attr(&mut self, attr: &str, value: c_int) -> Result<(), c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "modelsense" => {
                if value != GRB_MINIMIZE && value != GRB_MAXIMIZE {
                    return Err(GRB_ERROR_VALUE_OUT_OF_RANGE);
                }
                self.sense = value;
                self.invalidate();
                Ok(())
            }
            _ => self.int_attr(attr).and(Err(GRB_ERROR_INVALID_ARGUMENT)),
        }
    }

    pub(crate) fn dbl_attr(&self, attr: &str) -> Result<c_double, c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "objval" => self.obj_val.ok_or(GRB_ERROR_DATA_NOT_AVAILABLE),
            "objcon" => Ok(self.obj_con),
            "objnweight" => self.current_objective().map(|o| o.weight),
            "objnabstol" => self.current_objective().map(|o| o.abstol),
            "objnreltol" => self.current_objective().map(|o| o.reltol),
            "objncon" => self.current_objective().map(|o| o.constant),
            _ => Err(GRB_ERROR_UNKNOWN_ATTRIBUTE),
        }
    }

    pub(crate) fn set_dbl_attr(&mut self, attr: &str, value: c_double) -> Result<(), c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "objcon" => {
                self.obj_con = value;
                self.invalidate();
                Ok(())
            }
            _ => self.dbl_attr(attr).and(Err(GRB_ERROR_INVALID_ARGUMENT)),
        }
    }

    pub(crate) fn str_attr(&mut self, attr: &str) -> Result<*mut c_char, c_int> {
        let value = match attr.to_ascii_lowercase().as_str() {
            "modelname" => self.name.clone(),
            "objnname" => self.current_objective()?.name.clone(),
            _ => return Err(GRB_ERROR_UNKNOWN_ATTRIBUTE),
        };
        Ok(self.take_scratch(vec![value])[0])
    }

    pub(crate) fn set_str_attr(&mut self, attr: &str, value: String) -> Result<(), c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "modelname" => {
                self.name = value;
                Ok(())
            }
            _ => Err(GRB_ERROR_UNKNOWN_ATTRIBUTE),
        }
    }

    // Element attributes. Array and list forms loop over these.

    fn var(&self, index: c_int) -> Result<&Var, c_int> {
        self.check_var(index).map(|i| &self.vars[i])
    }

    fn var_mut(&mut self, index: c_int) -> Result<&mut Var, c_int> {
        let i = self.check_var(index)?;
        Ok(&mut self.vars[i])
    }

    fn constr(&self, index: c_int) -> Result<&Constr, c_int> {
        self.check_constr(index).map(|i| &self.constrs[i])
    }

    fn constr_mut(&mut self, index: c_int) -> Result<&mut Constr, c_int> {
        let i = self.check_constr(index)?;
        Ok(&mut self.constrs[i])
    }

    fn iis_flag(&self, index: c_int, pick: fn(&Iis) -> &Vec<bool>) -> Result<c_int, c_int> {
        let iis = self.iis.as_ref().ok_or(GRB_ERROR_DATA_NOT_AVAILABLE)?;
        let flags = pick(iis);
        usize::try_from(index)
            .ok()
            .and_then(|i| flags.get(i))
            .map(|flag| c_int::from(*flag))
            .ok_or(GRB_ERROR_INDEX_OUT_OF_RANGE)
    }

    pub(crate) fn int_element(&self, attr: &str, index: c_int) -> Result<c_int, c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "branchpriority" => self.var(index).map(|var| var.branch_priority),
            "iislb" => self.iis_flag(index, |iis| &iis.lb),
            "iisub" => self.iis_flag(index, |iis| &iis.ub),
            "iisconstr" => self.iis_flag(index, |iis| &iis.constrs),
            _ => Err(GRB_ERROR_UNKNOWN_ATTRIBUTE),
        }
    }

    pub(crate) fn set_int_element(
        &mut self,
        attr: &str,
        index: c_int,
        value: c_int,
    ) -> Result<(), c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "branchpriority" => {
                self.var_mut(index)?.branch_priority = value;
                Ok(())
            }
            _ => self
                .int_element(attr, index)
                .and(Err(GRB_ERROR_INVALID_ARGUMENT)),
        }
    }

    pub(crate) fn dbl_element(&self, attr: &str, index: c_int) -> Result<c_double, c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "obj" => self.var(index).map(|var| var.obj),
            "lb" => self.var(index).map(|var| var.lb),
            "ub" => self.var(index).map(|var| var.ub),
            "start" => self.var(index).map(|var| var.start),
            "x" => {
                let i = self.check_var(index)?;
                self.solution
                    .as_ref()
                    .map(|x| x[i])
                    .ok_or(GRB_ERROR_DATA_NOT_AVAILABLE)
            }
            "rhs" => self.constr(index).map(|constr| constr.rhs),
            "qcrhs" => self.qconstr(index).map(|qc| qc.rhs),
            "objn" => {
                self.check_var(index)?;
                Ok(self
                    .current_objective()?
                    .terms
                    .iter()
                    .filter(|(var, _)| *var == index)
                    .map(|(_, value)| value)
                    .sum())
            }
            _ => Err(GRB_ERROR_UNKNOWN_ATTRIBUTE),
        }
    }

    pub(crate) fn set_dbl_element(
        &mut self,
        attr: &str,
        index: c_int,
        value: c_double,
    ) -> Result<(), c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "obj" => self.var_mut(index)?.obj = value,
            "lb" => self.var_mut(index)?.lb = value,
            "ub" => self.var_mut(index)?.ub = value,
            "start" => self.var_mut(index)?.start = value,
            "rhs" => self.constr_mut(index)?.rhs = value,
            _ => {
                return self
                    .dbl_element(attr, index)
                    .and(Err(GRB_ERROR_INVALID_ARGUMENT));
            }
        }
        self.invalidate();
        Ok(())
    }

    pub(crate) fn char_element(&self, attr: &str, index: c_int) -> Result<c_char, c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "vtype" => self.var(index).map(|var| var.vtype),
            "sense" => self.constr(index).map(|constr| constr.sense),
            "qcsense" => self.qconstr(index).map(|qc| qc.sense),
            _ => Err(GRB_ERROR_UNKNOWN_ATTRIBUTE),
        }
    }

    pub(crate) fn set_char_element(
        &mut self,
        attr: &str,
        index: c_int,
        value: c_char,
    ) -> Result<(), c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "vtype" => {
                if !valid_vtype(value) {
                    return Err(GRB_ERROR_INVALID_ARGUMENT);
                }
                self.var_mut(index)?.vtype = value;
            }
            "sense" => {
                if !valid_sense(value) {
                    return Err(GRB_ERROR_INVALID_ARGUMENT);
                }
                self.constr_mut(index)?.sense = value;
            }
            _ => return Err(GRB_ERROR_UNKNOWN_ATTRIBUTE),
        }
        self.invalidate();
        Ok(())
    }

    fn str_element_value(&self, attr: &str, index: c_int) -> Result<String, c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "varname" => self.var(index).map(|var| var.name.clone()),
            "constrname" => self.constr(index).map(|constr| constr.name.clone()),
            "qcname" => self.qconstr(index).map(|qc| qc.name.clone()),
            _ => Err(GRB_ERROR_UNKNOWN_ATTRIBUTE),
        }
    }

    /// Fetch `indices` of a string attribute; pointers stay valid until the
    /// next string getter runs on this model.
    pub(crate) fn str_elements(
        &mut self,
        attr: &str,
        indices: impl Iterator<Item = c_int>,
    ) -> Result<Vec<*mut c_char>, c_int> {
        let values = indices
            .map(|index| self.str_element_value(attr, index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.take_scratch(values))
    }

    pub(crate) fn set_str_element(
        &mut self,
        attr: &str,
        index: c_int,
        value: String,
    ) -> Result<(), c_int> {
        match attr.to_ascii_lowercase().as_str() {
            "varname" => self.var_mut(index)?.name = value,
            "constrname" => self.constr_mut(index)?.name = value,
            "qcname" => {
                let qc = usize::try_from(index)
                    .ok()
                    .and_then(|i| self.qconstrs.get_mut(i))
                    .ok_or(GRB_ERROR_INDEX_OUT_OF_RANGE)?;
                qc.name = value;
            }
            _ => return Err(GRB_ERROR_UNKNOWN_ATTRIBUTE),
        }
        Ok(())
    }
}

fn parse_var(rest: &str) -> Option<Var> {
    let mut fields = rest.split_whitespace();
    let name = fields.next()?.to_string();
    let obj = fields.next()?.parse().ok()?;
    let lb = fields.next()?.parse().ok()?;
    let ub = fields.next()?.parse().ok()?;
    let vtype = *fields.next()?.as_bytes().first()? as c_char;
    Some(Var {
        obj,
        lb,
        ub,
        vtype,
        name,
        branch_priority: 0,
        start: GRB_UNDEFINED,
    })
}

fn parse_constr(rest: &str) -> Option<Constr> {
    let mut fields = rest.split_whitespace();
    let name = fields.next()?.to_string();
    let sense = *fields.next()?.as_bytes().first()? as c_char;
    let rhs = fields.next()?.parse().ok()?;
    let terms = match fields.next() {
        Some(list) => list
            .split(',')
            .map(|term| {
                let (index, value) = term.split_once(':')?;
                Some((index.parse().ok()?, value.parse().ok()?))
            })
            .collect::<Option<Vec<_>>>()?,
        None => Vec::new(),
    };
    Some(Constr {
        terms,
        sense,
        rhs,
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_vars(n: usize) -> StubModel {
        let env = StubEnv::new(1);
        StubModel::new(2, &env, "m".to_string(), (0..n).map(Var::new).collect())
    }

    #[test]
    fn test_add_constr_rejects_unknown_variable() {
        let mut model = model_with_vars(2);
        assert_eq!(
            model.add_constr(vec![(5, 1.0)], GRB_LESS_EQUAL, 1.0, None),
            Err(GRB_ERROR_INDEX_OUT_OF_RANGE)
        );
        assert_eq!(model.num_constrs(), 0);
    }

    #[test]
    fn test_optimize_prefers_origin_within_bounds() {
        let mut model = model_with_vars(2);
        model.set_dbl_element("LB", 1, 3.0).unwrap();
        model.set_dbl_element("Obj", 1, 2.0).unwrap();
        model.optimize();
        assert_eq!(model.int_attr("Status"), Ok(GRB_OPTIMAL));
        assert_eq!(model.dbl_element("X", 1), Ok(3.0));
        assert_eq!(model.dbl_attr("ObjVal"), Ok(6.0));
    }

    #[test]
    fn test_crossed_bounds_are_infeasible_with_iis() {
        let mut model = model_with_vars(1);
        assert_eq!(model.compute_iis(), Err(GRB_ERROR_IIS_NOT_INFEASIBLE));
        model.set_dbl_element("LB", 0, 5.0).unwrap();
        model.set_dbl_element("UB", 0, 1.0).unwrap();
        model.optimize();
        assert_eq!(model.int_attr("Status"), Ok(GRB_INFEASIBLE));
        assert_eq!(model.compute_iis(), Ok(()));
        assert_eq!(model.int_element("IISLB", 0), Ok(1));
    }

    #[test]
    fn test_objective_attributes_follow_obj_number() {
        let mut model = model_with_vars(2);
        let objective = |priority, name: &str| ObjectiveN {
            priority,
            weight: 1.0,
            abstol: 0.0,
            reltol: 0.0,
            name: name.to_string(),
            constant: 0.0,
            terms: vec![(1, 4.0)],
        };
        model.set_objective_n(0, objective(5, "first")).unwrap();
        model.set_objective_n(1, objective(2, "second")).unwrap();
        assert_eq!(model.int_attr("ObjNPriority"), Ok(5));

        model.env.params.set_int("ObjNumber", 1).unwrap();
        assert_eq!(model.int_attr("ObjNPriority"), Ok(2));
        assert_eq!(model.dbl_element("ObjN", 1), Ok(4.0));
        assert_eq!(model.dbl_element("ObjN", 0), Ok(0.0));

        model.env.params.set_int("ObjNumber", 7).unwrap();
        assert_eq!(model.int_attr("ObjNPriority"), Err(GRB_ERROR_DATA_NOT_AVAILABLE));
    }

    #[test]
    fn test_write_then_read_keeps_structure() {
        let dir = std::env::temp_dir().join(format!("gurobind-testkit-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roundtrip.lp");

        let mut model = model_with_vars(2);
        model
            .add_constr(vec![(0, 1.0), (1, 2.0)], GRB_LESS_EQUAL, 4.0, None)
            .unwrap();
        model.write(&path).unwrap();

        let env = StubEnv::new(3);
        let read = StubModel::read(4, &env, &path).unwrap();
        assert_eq!(read.num_vars(), 2);
        assert_eq!(read.num_constrs(), 1);
        assert_eq!(read.constrs[0].terms, vec![(0, 1.0), (1, 2.0)]);
        let _ = fs::remove_dir_all(&dir);
    }
}
