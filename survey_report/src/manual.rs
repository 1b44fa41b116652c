/*!

This is the long-form manual for `survey_report` and `surveydash`.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values, with a header row
* `xlsx` Excel workbook

When no input type is given, it is inferred from the extension of the file.

Files saved by statistical packages (R `.rda`/`.RData`, SPSS `.sav`, Stata `.dta`) are not
read. Export them to csv or xlsx first. The `--convert <target>` option of `surveydash` only
reads the two formats above and always writes a flat csv file, with missing answers as
empty cells.

### csv

The first row holds the names of the columns. Every following row is one respondent.

```text
ResponseId,gender,major,Q28_2,Q36_discrimination,Q24_1
R1,Male,CS,Agree,Yes,6
R2,Female,CS,Strongly agree,No,5
R3,,Math,Agree,,2
```

Cells are interpreted as follows:
- an empty cell, or one of the usual missing-value markers (`NA`, `N/A`, `NaN`, `NULL`,
  `None`, `#N/A`, ...) is a missing answer. The marker must be the whole cell: a cell holding
  only spaces, or ` NA`, is text.
- a cell that reads as a number is numeric. Numbers are displayed without a fractional part
  when they are integral (`6` and not `6.0`).
- anything else is text.

Rows in which every cell is missing are dropped. Repeated column names are renamed
`name.1`, `name.2`, ... and empty column names become `Unnamed: <position>`.

### xlsx

Excel workbooks. The first row of the worksheet holds the names of the columns.
Use `excelWorksheetName` (configuration) or `--excel-worksheet-name` to select the worksheet,
otherwise the first worksheet is read.

Number cells are numeric and text cells follow the rules of the csv format. Date cells are
read as text in the form `2022-04-01 12:00:00`, booleans as `true` or `false`. Empty and error
cells are missing answers.

## Questions and columns

The questions offered in Build-a-Graph are fixed, see [crate::catalog]. Their identifiers
(`Q28_2`, `Q36`, ...) do not need to be the exact names of the columns: if no column carries
exactly the identifier, the first column (from left to right) whose name contains it, ignoring
case, is used. For example `Q36` will find `Q36_discrimination`. When several columns match,
a warning is printed with all the candidates.

## Grouping variables

| Label         | Column          |
|---------------|-----------------|
| Gender        | `gender`        |
| Race          | `race`          |
| First Gen     | `first_gen`     |
| International | `international` |
| Major         | `major`         |
| Preparedness  | `prep`          |
| Work Status   | `work_status`   |
| None          | no grouping     |

If the column of the selected variable is not in the data, the answers are shown without
grouping.

## Summaries

Missing answers are never counted. They are replaced by the placeholder `No Response`,
and every row carrying that placeholder is removed (including answers that literally read
`No Response`). The rows are sorted by decreasing count, and rows with the same count keep
the order in which they first appear in the data.

Proportions are relative to all the answers, or with a grouping variable, to the answers
of the respondents sharing the same value of the variable.

## Configuration

`surveydash` runs without configuration, reading `data/survey_data.csv`. A configuration file
in JSON can be passed with `--config`:

```text
{
  "dataFile": "survey_data.xlsx",
  "inputType": "xlsx",
  "excelWorksheetName": "Responses",
  "reportTitle": "DEI in Tech Climate Survey Interactive Report",
  "outputPath": "out/page.json"
}
```

All the fields except `dataFile` are optional. A relative `dataFile` is relative to the
directory of the configuration file. The command line options take precedence.

 */
